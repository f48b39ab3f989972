/// Application instance record tracked per tenant.
///
/// All descriptive fields are opaque to this service and round-tripped
/// unchanged between the transport shape and the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInstanceInfo {
    pub app_instance_id: String,
    pub app_name: String,
    pub app_package_id: String,
    pub app_descriptor: String,
    pub mec_host: String,
    pub applcm_host: String,
    pub operational_status: String,
    pub operation_info: String,
}
