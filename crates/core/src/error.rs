use std::path::PathBuf;
use std::time::Duration;

use crate::labels::LabelScope;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read directory {}: {reason}", .path.display())]
    DirectoryUnreadable { path: PathBuf, reason: String },

    #[error("descriptor not found: {}", .0.display())]
    MissingMetadata(PathBuf),

    #[error("invalid descriptor {}: {message}", .path.display())]
    InvalidMetadata { path: PathBuf, message: String },

    #[error("invalid date in {}: {message}", .path.display())]
    InvalidDate { path: PathBuf, message: String },

    #[error("invalid rgb color in {}: {message}", .path.display())]
    InvalidColor { path: PathBuf, message: String },

    #[error("ambiguous location kind at {}: {reason}", .path.display())]
    AmbiguousLocationKind { path: PathBuf, reason: String },

    #[error("unexpected entry in archive: {}", .0.display())]
    UnexpectedEntry(PathBuf),

    #[error("duplicate label {label:?} in {scope}: used by both {first:?} and {second:?}")]
    DuplicateLabel {
        scope: LabelScope,
        label: String,
        first: String,
        second: String,
    },

    #[error("catalog build exceeded its {:?} deadline", .0)]
    BuildTimedOut(Duration),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
