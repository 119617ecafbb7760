use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the data layer. Lookup misses and absent sheets are not
/// errors and never show up here.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read directory {}", path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{file_name}` does not match `{expected}`")]
    FrameName { file_name: String, expected: String },

    #[error("`{file_name}` repeats frame number {number}, skipped")]
    DuplicateFrameNumber { file_name: String, number: u64 },

    #[error("cannot derive a sheet key from `{0}`")]
    FrameKey(String),

    #[error("failed to read spreadsheet {}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("spreadsheet {} has no `{column}` column", path.display())]
    MissingFrameColumn { path: PathBuf, column: String },

    #[error("spreadsheet {} lists `{key}` more than once", path.display())]
    DuplicateFrameKey { path: PathBuf, key: String },
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
