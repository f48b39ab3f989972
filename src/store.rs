use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    error::{Error, Result},
    model::AppInstanceInfo,
    paths::data_dir,
    service::AppInstanceInfoService,
};

/// SQLite-backed store for application instance records.
///
/// Holds only the database path; a fresh connection is opened per call so the
/// store stays cheap to clone into handler state.
#[derive(Clone)]
pub struct InstanceInfoStore {
    db_path: PathBuf,
}

impl InstanceInfoStore {
    pub fn open(custom_root: Option<PathBuf>) -> Result<Self> {
        let base = custom_root.unwrap_or_else(data_dir);
        if !base.exists() {
            fs::create_dir_all(&base).map_err(|err| {
                Error::Persistence(format!(
                    "Failed to create data directory {}: {err}",
                    base.display()
                ))
            })?;
        }
        let db_path = base.join("instance_infos.sqlite3");
        let store = Self { db_path };
        store.init_schema()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(|err| {
            Error::Persistence(format!(
                "Failed to open instance info database {}: {err}",
                self.db_path.display()
            ))
        })
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS app_instance_infos (
                tenant_id TEXT NOT NULL,
                app_instance_id TEXT NOT NULL,
                app_name TEXT NOT NULL,
                app_package_id TEXT NOT NULL,
                app_descriptor TEXT NOT NULL,
                mec_host TEXT NOT NULL,
                applcm_host TEXT NOT NULL,
                operational_status TEXT NOT NULL,
                operation_info TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (tenant_id, app_instance_id)
            );
            "#,
        )?;
        Ok(())
    }

    fn load(&self, tenant_id: &str, app_instance_id: &str) -> Result<Option<AppInstanceInfo>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                r#"
                SELECT app_instance_id, app_name, app_package_id, app_descriptor,
                       mec_host, applcm_host, operational_status, operation_info
                FROM app_instance_infos
                WHERE tenant_id = ?1 AND app_instance_id = ?2
                "#,
                params![tenant_id, app_instance_id],
                row_to_info,
            )
            .optional()?;
        Ok(row)
    }

    fn write(&self, tenant_id: &str, info: &AppInstanceInfo) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO app_instance_infos (
                tenant_id, app_instance_id, app_name, app_package_id, app_descriptor,
                mec_host, applcm_host, operational_status, operation_info, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(tenant_id, app_instance_id)
            DO UPDATE SET
                app_name=excluded.app_name,
                app_package_id=excluded.app_package_id,
                app_descriptor=excluded.app_descriptor,
                mec_host=excluded.mec_host,
                applcm_host=excluded.applcm_host,
                operational_status=excluded.operational_status,
                operation_info=excluded.operation_info,
                updated_at=excluded.updated_at
            "#,
            params![
                tenant_id,
                info.app_instance_id,
                info.app_name,
                info.app_package_id,
                info.app_descriptor,
                info.mec_host,
                info.applcm_host,
                info.operational_status,
                info.operation_info,
                timestamp()
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl AppInstanceInfoService for InstanceInfoStore {
    async fn get(&self, tenant_id: &str, app_instance_id: &str) -> Result<AppInstanceInfo> {
        self.load(tenant_id, app_instance_id)?.ok_or_else(|| {
            Error::NotFound(format!(
                "application instance {app_instance_id} for tenant {tenant_id}"
            ))
        })
    }

    async fn get_all(&self, tenant_id: &str) -> Result<Vec<AppInstanceInfo>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT app_instance_id, app_name, app_package_id, app_descriptor,
                   mec_host, applcm_host, operational_status, operation_info
            FROM app_instance_infos
            WHERE tenant_id = ?1
            ORDER BY updated_at DESC, app_instance_id
            "#,
        )?;
        let rows = stmt.query_map(params![tenant_id], row_to_info)?;

        let mut infos = Vec::new();
        for row in rows {
            infos.push(row?);
        }
        Ok(infos)
    }

    async fn create(&self, tenant_id: &str, info: AppInstanceInfo) -> Result<AppInstanceInfo> {
        if info.app_instance_id.is_empty() {
            return Err(Error::InvalidInput(
                "application instance id must not be empty".into(),
            ));
        }
        if self.load(tenant_id, &info.app_instance_id)?.is_some() {
            return Err(Error::Conflict(format!(
                "application instance {} already exists for tenant {tenant_id}",
                info.app_instance_id
            )));
        }
        self.write(tenant_id, &info)?;
        Ok(info)
    }

    async fn update(&self, tenant_id: &str, info: AppInstanceInfo) -> Result<AppInstanceInfo> {
        if self.load(tenant_id, &info.app_instance_id)?.is_none() {
            return Err(Error::NotFound(format!(
                "application instance {} for tenant {tenant_id}",
                info.app_instance_id
            )));
        }
        self.write(tenant_id, &info)?;
        self.load(tenant_id, &info.app_instance_id)?.ok_or_else(|| {
            Error::Persistence(format!(
                "application instance {} missing after update",
                info.app_instance_id
            ))
        })
    }

    async fn delete(&self, tenant_id: &str, app_instance_id: &str) -> Result<()> {
        let conn = self.connect()?;
        let deleted = conn.execute(
            "DELETE FROM app_instance_infos WHERE tenant_id = ?1 AND app_instance_id = ?2",
            params![tenant_id, app_instance_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!(
                "application instance {app_instance_id} for tenant {tenant_id}"
            )));
        }
        Ok(())
    }
}

fn row_to_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppInstanceInfo> {
    Ok(AppInstanceInfo {
        app_instance_id: row.get(0)?,
        app_name: row.get(1)?,
        app_package_id: row.get(2)?,
        app_descriptor: row.get(3)?,
        mec_host: row.get(4)?,
        applcm_host: row.get(5)?,
        operational_status: row.get(6)?,
        operation_info: row.get(7)?,
    })
}

fn timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_secs() as i64)
        .unwrap_or_default()
}
