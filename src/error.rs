//! Error type shared by both dictionary backends and the configuration layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Represents the failures that can occur while building or configuring a dictionary.
///
/// Malformed tokens in a word list are **not** errors: they are skipped and
/// reported through [`crate::LoadReport`]. Only conditions that stop a load
/// (or make a configuration unusable) surface here.
///
/// # Variants
/// - `Io`: the word list could not be opened, or a read failed part-way.
///   Anything inserted before the failure stays in the dictionary, and
///   `unload()` remains safe to call.
/// - `Read`: a read failed on a caller-supplied reader (no path is known).
/// - `InvalidConfig`: an unknown backend / table size, or malformed JSON.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("I/O Error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O Error: {0}")]
    Read(#[from] io::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl DictionaryError {
    /// Attaches the word-list path to a bare read error.
    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            DictionaryError::Read(source) => DictionaryError::Io {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for DictionaryError {
    fn from(err: serde_json::Error) -> Self {
        DictionaryError::InvalidConfig(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DictionaryError>;
