use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the parsing, aggregation and export stages.
///
/// `MalformedLine` and `DataConsistency` are recoverable: the caller keeps
/// them as diagnostics and carries on. `FileAccess` and `Write` abort the
/// operation they come from.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("line {line_no}: {reason}: {line}")]
    MalformedLine {
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("inconsistent data for {entity}: {detail}")]
    DataConsistency { entity: String, detail: String },

    #[error("failed to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("config: {0}")]
    Config(String),
}

pub type DigestResult<T> = Result<T, DigestError>;
