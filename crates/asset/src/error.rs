//! Error type shared by every loader in this crate.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Magic bytes or container signature did not match.
    #[error("Format error: {0}")]
    Format(String),

    #[error("Truncated {what}: need {needed} bytes, have {available}")]
    TruncatedData {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{kind} index {index} out of range (len={len}) on line {line}")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        len: usize,
    },

    #[error(
        "Attribute arrays differ in length: {positions} positions, {uvs} uvs, {normals} normals"
    )]
    AttributeMismatch {
        positions: usize,
        uvs: usize,
        normals: usize,
    },

    #[error("Too many vertices (>{})", u32::MAX)]
    TooManyVertices,

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
