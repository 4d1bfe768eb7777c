//! Operations behind the two user actions: process a batch, archive the output.

pub mod archive;
pub mod batch;

pub use archive::{ArchiveError, ArchiveReport, Archiver};
pub use batch::{BatchDriver, BatchError, BatchReport, ImageOutcome, SkipReason, Skipped};
