use async_trait::async_trait;

use crate::{error::Result, model::AppInstanceInfo};

/// Collaborator contract for storing and querying application instance
/// records, keyed by (tenant id, application instance id).
///
/// The HTTP layer depends only on this trait; failures it raises (not-found,
/// conflict, persistence) are surfaced to the caller unmodified.
#[async_trait]
pub trait AppInstanceInfoService: Send + Sync {
    /// Fetch one record.
    async fn get(&self, tenant_id: &str, app_instance_id: &str) -> Result<AppInstanceInfo>;
    /// Fetch all records for a tenant, in collaborator-chosen order.
    async fn get_all(&self, tenant_id: &str) -> Result<Vec<AppInstanceInfo>>;
    /// Create a record; the record's instance id must be unique per tenant.
    async fn create(&self, tenant_id: &str, info: AppInstanceInfo) -> Result<AppInstanceInfo>;
    /// Replace an existing record, returning the stored state.
    async fn update(&self, tenant_id: &str, info: AppInstanceInfo) -> Result<AppInstanceInfo>;
    /// Delete a record.
    async fn delete(&self, tenant_id: &str, app_instance_id: &str) -> Result<()>;
}
