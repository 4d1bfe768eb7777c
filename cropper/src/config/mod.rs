//! Configuration management: defaults, validation, loading from `.env` + environment.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::{AppConfig, ConfigError, PolaritySetting};

use serde::Serialize;

/// A setting as shown by the `config` command.
#[derive(Debug, Clone, Serialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub default: String,
    pub description: String,
    pub is_default: bool,
}

/// Describe every known setting with its effective value from `lookup`.
pub fn describe_settings<F>(lookup: F) -> Vec<SettingInfo>
where
    F: Fn(&str) -> Option<String>,
{
    defaults::keys()
        .filter_map(|key| defaults::DEFAULT_SETTINGS.get(key))
        .map(|def| {
            let value = lookup(def.key)
                .filter(|v| validation::validate_setting(def.key, v).is_ok())
                .unwrap_or_else(|| def.default.to_string());
            SettingInfo {
                key: def.key.to_string(),
                is_default: value == def.default,
                value,
                default: def.default.to_string(),
                description: def.description.to_string(),
            }
        })
        .collect()
}
