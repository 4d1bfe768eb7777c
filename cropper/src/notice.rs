//! User-visible notices and the sinks that deliver them.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
}

/// Every message the user can be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    NoFileSelected,
    NoCharacterFound { file: String },
    ContourTooSmall { file: String, area: f64 },
    Unreadable { file: String, reason: String },
    BatchSucceeded { written: usize, skipped: usize },
    NothingToArchive,
    ArchiveWritten { path: String },
    OutputCleared,
}

impl Notice {
    pub fn level(&self) -> Level {
        match self {
            Self::NoFileSelected
            | Self::NoCharacterFound { .. }
            | Self::ContourTooSmall { .. }
            | Self::Unreadable { .. }
            | Self::NothingToArchive => Level::Warning,
            Self::BatchSucceeded { .. } | Self::ArchiveWritten { .. } | Self::OutputCleared => {
                Level::Info
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NoFileSelected => "No File Selected",
            Self::NoCharacterFound { .. } => "No Character Found",
            Self::ContourTooSmall { .. } => "No Valid Character Found",
            Self::Unreadable { .. } => "Unreadable Image",
            Self::BatchSucceeded { .. } => "Success",
            Self::NothingToArchive => "Nothing To Archive",
            Self::ArchiveWritten { .. } => "Success",
            Self::OutputCleared => "Cleared",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NoFileSelected => "Please select at least one image.".to_string(),
            Self::NoCharacterFound { file } => format!("No character detected in {file}."),
            Self::ContourTooSmall { file, area } => {
                format!("The detected contour in {file} is too small (area {area:.1}).")
            }
            Self::Unreadable { file, reason } => format!("Could not read {file}: {reason}"),
            Self::BatchSucceeded { written, skipped } => {
                format!("Images processed successfully! {written} written, {skipped} skipped.")
            }
            Self::NothingToArchive => "There are no processed images to archive.".to_string(),
            Self::ArchiveWritten { path } => format!("ZIP file saved as {path}"),
            Self::OutputCleared => "Processed images folder has been cleared.".to_string(),
        }
    }
}

/// Delivers notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the tracing log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level() {
            Level::Info => tracing::info!(title = notice.title(), "{}", notice.message()),
            Level::Warning => tracing::warn!(title = notice.title(), "{}", notice.message()),
        }
    }
}

/// Prints notices for an interactive terminal user.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level() {
            Level::Info => println!("[{}] {}", notice.title(), notice.message()),
            Level::Warning => eprintln!("[!] [{}] {}", notice.title(), notice.message()),
        }
    }
}

/// Collects notices in memory (for testing).
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }
}
