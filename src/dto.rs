use serde::{Deserialize, Serialize};

use crate::{
    config::IdValidators,
    error::{Error, Result},
    model::AppInstanceInfo,
};

/// Transport shape exchanged over the HTTP boundary.
///
/// Structurally parallel to [`AppInstanceInfo`]; the conversions below are
/// explicit field-by-field copies so a mapping gap is a compile error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInstanceInfoDto {
    #[serde(default)]
    pub app_instance_id: String,
    pub app_name: String,
    pub app_package_id: String,
    #[serde(default)]
    pub app_descriptor: String,
    pub mec_host: String,
    #[serde(default)]
    pub applcm_host: String,
    #[serde(default)]
    pub operational_status: String,
    #[serde(default)]
    pub operation_info: String,
}

impl AppInstanceInfoDto {
    /// Structural validation applied to request bodies before delegation.
    pub fn validate(&self, validators: &IdValidators) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(Error::InvalidInput("appName must not be empty".into()));
        }
        if self.app_package_id.trim().is_empty() {
            return Err(Error::InvalidInput("appPackageId must not be empty".into()));
        }
        if self.mec_host.trim().is_empty() {
            return Err(Error::InvalidInput("mecHost must not be empty".into()));
        }
        if !self.app_instance_id.is_empty() && !validators.app_instance_id_ok(&self.app_instance_id)
        {
            return Err(Error::InvalidInput(format!(
                "appInstanceId '{}' does not match the configured pattern",
                self.app_instance_id
            )));
        }
        Ok(())
    }
}

impl From<AppInstanceInfoDto> for AppInstanceInfo {
    fn from(value: AppInstanceInfoDto) -> Self {
        Self {
            app_instance_id: value.app_instance_id,
            app_name: value.app_name,
            app_package_id: value.app_package_id,
            app_descriptor: value.app_descriptor,
            mec_host: value.mec_host,
            applcm_host: value.applcm_host,
            operational_status: value.operational_status,
            operation_info: value.operation_info,
        }
    }
}

impl From<AppInstanceInfo> for AppInstanceInfoDto {
    fn from(value: AppInstanceInfo) -> Self {
        Self {
            app_instance_id: value.app_instance_id,
            app_name: value.app_name,
            app_package_id: value.app_package_id,
            app_descriptor: value.app_descriptor,
            mec_host: value.mec_host,
            applcm_host: value.applcm_host,
            operational_status: value.operational_status,
            operation_info: value.operation_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;

    fn sample_entity() -> AppInstanceInfo {
        AppInstanceInfo {
            app_instance_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".into(),
            app_name: "positioning-service".into(),
            app_package_id: "f50358433cf8eb4719a62a49ed118c9b".into(),
            app_descriptor: "positioning service v1".into(),
            mec_host: "1.1.1.1".into(),
            applcm_host: "2.2.2.2".into(),
            operational_status: "Instantiated".into(),
            operation_info: "instantiation completed".into(),
        }
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let entity = sample_entity();
        let dto = AppInstanceInfoDto::from(entity.clone());
        let back = AppInstanceInfo::from(dto);
        assert_eq!(back, entity);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let dto = AppInstanceInfoDto::from(sample_entity());
        let json = serde_json::to_value(&dto).expect("serializable dto");
        assert!(json.get("appInstanceId").is_some());
        assert!(json.get("mecHost").is_some());
        assert!(json.get("app_instance_id").is_none());
    }

    #[test]
    fn rejects_blank_required_fields() {
        let validators = IdValidators::from_config(&ValidationConfig::default()).unwrap();
        let mut dto = AppInstanceInfoDto::from(sample_entity());
        dto.app_name = "  ".into();
        let err = dto.validate(&validators).unwrap_err();
        assert!(err.to_string().contains("appName"));
    }

    #[test]
    fn rejects_malformed_body_instance_id() {
        let validators = IdValidators::from_config(&ValidationConfig::default()).unwrap();
        let mut dto = AppInstanceInfoDto::from(sample_entity());
        dto.app_instance_id = "not-a-uuid".into();
        let err = dto.validate(&validators).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn empty_body_instance_id_is_accepted() {
        let validators = IdValidators::from_config(&ValidationConfig::default()).unwrap();
        let mut dto = AppInstanceInfoDto::from(sample_entity());
        dto.app_instance_id = String::new();
        dto.validate(&validators).expect("empty id left to the caller");
    }
}
