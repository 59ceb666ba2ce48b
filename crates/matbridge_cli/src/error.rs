// SPDX-License-Identifier: MIT OR Apache-2.0
//! CLI error type.

use matbridge_convert::ConvertError;
use std::path::{Path, PathBuf};

/// Error from a CLI command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading or writing a file failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed RON document
    #[error("Invalid RON: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// RON serialization failed
    #[error("Failed to write RON: {0}")]
    RonWrite(#[from] ron::Error),

    /// Malformed or unserializable JSON document
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Scene path without a `.ron` or `.json` extension
    #[error("Unsupported scene format '{}' (expected .ron or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// File written by a newer release
    #[error("Format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Conversion could not run
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl CliError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
