//! Setting value validation.

use super::app_config::PolaritySetting;
use super::defaults::{JPEG_QUALITY, MIN_AREA, OUTPUT_DIR, PADDING, POLARITY};

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        OUTPUT_DIR => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        PADDING => validate_int_range(value, 0, 1000)?,
        MIN_AREA => {
            let v: f64 = value.parse().map_err(|_| "must be a number")?;
            if !v.is_finite() || v < 0.0 {
                return Err("must be a non-negative number".into());
            }
        }
        JPEG_QUALITY => validate_int_range(value, 1, 100)?,
        POLARITY => {
            value.parse::<PolaritySetting>()?;
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
