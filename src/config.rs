use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result, ensure};
use regex::Regex;
use serde::Deserialize;

/// UUID grammar used for both identifier patterns unless configuration
/// overrides them. The grammars are owned by the collaborating platform and
/// therefore live in configuration, not in code.
const DEFAULT_ID_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppoConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl AppoConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file at {}", path_ref.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", path_ref.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Unable to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.server.bind.trim().is_empty(),
            "server.bind must not be empty"
        );
        self.validation.validate()?;
        Ok(())
    }
}

impl FromStr for AppoConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml_str(s)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Identifier grammars applied to path and body parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    #[serde(default = "default_id_pattern")]
    pub tenant_id_pattern: String,
    #[serde(default = "default_id_pattern")]
    pub app_instance_id_pattern: String,
}

impl ValidationConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            !self.tenant_id_pattern.trim().is_empty(),
            "validation.tenant_id_pattern must not be empty"
        );
        ensure!(
            !self.app_instance_id_pattern.trim().is_empty(),
            "validation.app_instance_id_pattern must not be empty"
        );
        compile_full_match(&self.tenant_id_pattern)
            .context("validation.tenant_id_pattern is not a valid pattern")?;
        compile_full_match(&self.app_instance_id_pattern)
            .context("validation.app_instance_id_pattern is not a valid pattern")?;
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tenant_id_pattern: default_id_pattern(),
            app_instance_id_pattern: default_id_pattern(),
        }
    }
}

/// Compiled identifier patterns shared by the request handlers.
#[derive(Debug, Clone)]
pub struct IdValidators {
    tenant: Regex,
    app_instance: Regex,
}

impl IdValidators {
    pub fn from_config(config: &ValidationConfig) -> Result<Self> {
        Ok(Self {
            tenant: compile_full_match(&config.tenant_id_pattern)
                .context("Failed to compile tenant id pattern")?,
            app_instance: compile_full_match(&config.app_instance_id_pattern)
                .context("Failed to compile application instance id pattern")?,
        })
    }

    pub fn tenant_id_ok(&self, value: &str) -> bool {
        self.tenant.is_match(value)
    }

    pub fn app_instance_id_ok(&self, value: &str) -> bool {
        self.app_instance.is_match(value)
    }
}

// Patterns must match the whole identifier, never a substring.
fn compile_full_match(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$"))
        .with_context(|| format!("Invalid identifier pattern '{pattern}'"))
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8091
}

fn default_id_pattern() -> String {
    DEFAULT_ID_PATTERN.to_string()
}
