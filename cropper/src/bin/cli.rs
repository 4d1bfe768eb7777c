//! Command-line front end.
//!
//! `process` stands in for the upload button, `archive` for the ZIP button.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thumb_store::DirStorage;
use tracing_subscriber::EnvFilter;

use glyph_cropper_lib::app::AppState;
use glyph_cropper_lib::config::describe_settings;
use glyph_cropper_lib::notice::{ConsoleNotifier, LogNotifier, Notifier};
use glyph_cropper_lib::services::{ArchiveError, Archiver, BatchDriver, BatchError};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Parser)]
#[command(name = "glyph-cropper")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crop character images to 100x100 thumbnails and bundle them as ZIP")]
struct Cli {
    /// Override the output directory for processed thumbnails.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print the run report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a thumbnail from each image into the output directory.
    Process {
        /// JPEG or PNG files to process.
        files: Vec<PathBuf>,
    },
    /// Pack the output directory into a ZIP archive, then clear it.
    Archive {
        /// Archive path. `.zip` is appended when it has no extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the effective settings.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = glyph_cropper_lib::init_config()?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    // JSON output owns stdout, so notices go to the log instead.
    let notifier: Arc<dyn Notifier> = if cli.json {
        Arc::new(LogNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    let storage = Arc::new(DirStorage::new(config.output_dir.clone()));
    let state = AppState::new(config, storage, notifier);

    match cli.command {
        Command::Process { files } => run_process(&state, &files, cli.json),
        Command::Archive { output } => run_archive(&state, output, cli.json),
        Command::Config => {
            let settings = describe_settings(|key| std::env::var(key).ok());
            let out = serde_json::json!({
                "effective": serde_json::to_value(state.config())?,
                "settings": serde_json::to_value(&settings)?,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}

fn run_process(state: &AppState, files: &[PathBuf], json: bool) -> Result<()> {
    let selected = filter_images(files);

    let report = match BatchDriver::new(state).process_files(&selected) {
        Ok(report) => report,
        // Already shown to the user as a notice.
        Err(BatchError::NoInput) => return Ok(()),
        Err(e) => return Err(e).context("Batch aborted"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run_archive(state: &AppState, output: Option<PathBuf>, json: bool) -> Result<()> {
    let target = output.unwrap_or_else(default_archive_name);

    let report = match Archiver::new(state).archive_to_path(&target) {
        Ok(report) => report,
        Err(ArchiveError::NothingToArchive) => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to archive to {}", target.display()));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Keep only paths with a supported image extension.
fn filter_images(files: &[PathBuf]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|path| {
            let ok = has_image_extension(path);
            if !ok {
                tracing::warn!(path = %path.display(), "Ignoring file without a JPEG/PNG extension");
            }
            ok
        })
        .cloned()
        .collect()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn default_archive_name() -> PathBuf {
    PathBuf::from(format!(
        "thumbnails-{}.zip",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("a.png")));
        assert!(has_image_extension(Path::new("dir/b.JPG")));
        assert!(has_image_extension(Path::new("c.jpeg")));
        assert!(!has_image_extension(Path::new("d.gif")));
        assert!(!has_image_extension(Path::new("noext")));
    }

    #[test]
    fn test_filter_images_keeps_order() {
        let files = vec![
            PathBuf::from("b.png"),
            PathBuf::from("notes.txt"),
            PathBuf::from("a.jpg"),
        ];
        assert_eq!(
            filter_images(&files),
            vec![PathBuf::from("b.png"), PathBuf::from("a.jpg")]
        );
    }

    #[test]
    fn test_default_archive_name_is_zip() {
        let name = default_archive_name();
        assert_eq!(name.extension().and_then(|e| e.to_str()), Some("zip"));
        assert!(name.to_string_lossy().starts_with("thumbnails-"));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["glyph-cropper", "--json", "process", "a.png", "b.jpg"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Process { ref files } if files.len() == 2));

        let cli = Cli::try_parse_from(["glyph-cropper", "archive", "-o", "out"]).unwrap();
        assert!(
            matches!(cli.command, Command::Archive { output: Some(ref p) } if p == Path::new("out"))
        );
    }
}
