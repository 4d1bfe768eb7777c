//! Archiver: packs the output location into a flat ZIP, then clears it.
//!
//! The archive is finished before anything is deleted, so a failed write
//! never loses processed thumbnails.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thumb_store::StoreError;
use tracing::{debug, info, warn};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::app::AppState;
use crate::notice::Notice;

/// Summary of one archive run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveReport {
    /// Where the archive was written.
    pub archive: String,
    /// Entry names, in archive order.
    pub entries: Vec<String>,
    /// Number of files removed from the output location.
    pub removed: usize,
    /// Whether the output location itself was removed.
    pub location_removed: bool,
}

/// Archive error type.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("there are no processed images to archive")]
    NothingToArchive,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bundles the output location into a ZIP archive.
pub struct Archiver<'a> {
    state: &'a AppState,
}

impl<'a> Archiver<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Write the archive to a file, adding a `.zip` extension when the path
    /// has none.
    pub fn archive_to_path(&self, path: &Path) -> Result<ArchiveReport, ArchiveError> {
        let path = with_zip_extension(path);
        let names = self.archivable_names()?;
        let label = path.display().to_string();

        let file = File::create(&path).map_err(|source| ArchiveError::Io {
            path: label.clone(),
            source,
        })?;

        if let Err(e) = self.write_entries(&names, file, &label) {
            if let Err(rm) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), "Failed to remove partial archive: {rm}");
            }
            return Err(e);
        }

        self.finish(label, names)
    }

    /// Write the archive into any seekable writer. `label` names it in
    /// notices and the report.
    pub fn archive_to_writer<W: Write + Seek>(
        &self,
        writer: W,
        label: &str,
    ) -> Result<ArchiveReport, ArchiveError> {
        let names = self.archivable_names()?;
        self.write_entries(&names, writer, label)?;
        self.finish(label.to_string(), names)
    }

    fn archivable_names(&self) -> Result<Vec<String>, ArchiveError> {
        let names = self.state.storage().list()?;
        if names.is_empty() {
            self.state.notify(Notice::NothingToArchive);
            return Err(ArchiveError::NothingToArchive);
        }
        Ok(names)
    }

    fn write_entries<W: Write + Seek>(
        &self,
        names: &[String],
        writer: W,
        label: &str,
    ) -> Result<(), ArchiveError> {
        let storage = self.state.storage();
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(writer);

        for name in names {
            let bytes = storage.read(name)?;
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&bytes).map_err(|source| ArchiveError::Io {
                path: label.to_string(),
                source,
            })?;
            debug!(name, len = bytes.len(), "Added archive entry");
        }

        zip.finish()?;
        info!(archive = label, entries = names.len(), "Archive written");
        Ok(())
    }

    fn finish(&self, archive: String, names: Vec<String>) -> Result<ArchiveReport, ArchiveError> {
        self.state.notify(Notice::ArchiveWritten {
            path: archive.clone(),
        });

        let storage = self.state.storage();
        for name in &names {
            storage.remove(name)?;
        }
        let location_removed = storage.remove_location_if_empty()?;
        info!(
            removed = names.len(),
            location_removed,
            "Output location cleared"
        );
        self.state.notify(Notice::OutputCleared);

        Ok(ArchiveReport {
            archive,
            removed: names.len(),
            entries: names,
            location_removed,
        })
    }
}

/// Append `.zip` when `path` has no extension.
pub fn with_zip_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("zip")
    }
}
