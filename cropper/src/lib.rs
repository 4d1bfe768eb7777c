//! Character cropper: batch-extracts character thumbnails from scanned
//! images and bundles them into a ZIP archive.

pub mod app;
pub mod config;
pub mod notice;
pub mod services;

#[cfg(test)]
mod tests;

use config::AppConfig;

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

/// Load `.env`, then resolve the runtime configuration from the environment.
pub fn init_config() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();
    let config = AppConfig::load()?;
    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
