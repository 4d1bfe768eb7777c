//! Runtime application configuration loaded from defaults + environment.

use std::path::PathBuf;
use std::str::FromStr;

use glyph_extract::{ExtractError, ExtractOptions, Polarity};
use serde::Serialize;

use super::defaults::{self, JPEG_QUALITY, MIN_AREA, OUTPUT_DIR, PADDING, POLARITY};
use super::validation::validate_setting;

/// Ink polarity as it appears in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolaritySetting {
    Dark,
    Auto,
}

impl FromStr for PolaritySetting {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "auto" => Ok(Self::Auto),
            _ => Err("must be 'dark' or 'auto'".into()),
        }
    }
}

impl From<PolaritySetting> for Polarity {
    fn from(value: PolaritySetting) -> Self {
        match value {
            PolaritySetting::Dark => Polarity::DarkInk,
            PolaritySetting::Auto => Polarity::Auto,
        }
    }
}

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid extraction settings: {0}")]
    Extract(#[from] ExtractError),
}

/// Runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub padding: u32,
    pub min_area: f64,
    pub jpeg_quality: u8,
    pub polarity: PolaritySetting,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("processed_images"),
            padding: glyph_extract::DEFAULT_PADDING,
            min_area: glyph_extract::DEFAULT_MIN_AREA,
            jpeg_quality: 75,
            polarity: PolaritySetting::Dark,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset keys take their default. Values that fail validation are logged
    /// and replaced by the default.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> String {
            let default = defaults::get_default(key).unwrap_or_default();
            match lookup(key) {
                Some(value) => match validate_setting(key, &value) {
                    Ok(()) => value,
                    Err(e) => {
                        tracing::warn!(key, value = %value, "Invalid setting ({e}), using default {default}");
                        default.to_string()
                    }
                },
                None => default.to_string(),
            }
        };

        let base = Self::default();
        let config = Self {
            output_dir: PathBuf::from(g(OUTPUT_DIR)),
            padding: g(PADDING).parse().unwrap_or(base.padding),
            min_area: g(MIN_AREA).parse().unwrap_or(base.min_area),
            jpeg_quality: g(JPEG_QUALITY).parse().unwrap_or(base.jpeg_quality),
            polarity: g(POLARITY).parse().unwrap_or(base.polarity),
        };

        config.extract_options().validate()?;
        Ok(config)
    }

    /// Extraction options described by this configuration.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_padding(self.padding)
            .with_min_area(self.min_area)
            .with_polarity(self.polarity.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::load_from(|key| map.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]);
        assert_eq!(config.output_dir, PathBuf::from("processed_images"));
        assert_eq!(config.padding, 5);
        assert_eq!(config.min_area, 100.0);
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.polarity, PolaritySetting::Dark);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = load(&[
            (OUTPUT_DIR, "out/thumbs"),
            (PADDING, "8"),
            (MIN_AREA, "42.5"),
            (JPEG_QUALITY, "90"),
            (POLARITY, "auto"),
        ]);
        assert_eq!(config.output_dir, PathBuf::from("out/thumbs"));
        assert_eq!(config.padding, 8);
        assert_eq!(config.min_area, 42.5);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.polarity, PolaritySetting::Auto);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = load(&[(PADDING, "-4"), (JPEG_QUALITY, "0"), (POLARITY, "sideways")]);
        assert_eq!(config.padding, 5);
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.polarity, PolaritySetting::Dark);
    }

    #[test]
    fn test_polarity_is_case_insensitive() {
        assert_eq!(load(&[(POLARITY, "AUTO")]).polarity, PolaritySetting::Auto);
        assert_eq!(load(&[(POLARITY, " Auto ")]).polarity, PolaritySetting::Auto);
        assert_eq!(load(&[(POLARITY, "Dark")]).polarity, PolaritySetting::Dark);
    }

    #[test]
    fn test_extract_options_follow_config() {
        let config = load(&[(PADDING, "3"), (MIN_AREA, "10"), (POLARITY, "auto")]);
        let options = config.extract_options();
        assert_eq!(options.padding, 3);
        assert_eq!(options.min_area, 10.0);
        assert_eq!(options.polarity, Polarity::Auto);
        assert_eq!(options.output_size, glyph_extract::THUMBNAIL_SIZE);
    }
}
