//! Crate-level error type for configuration and persistence.
//!
//! The simulation itself never fails; these errors only surface from the
//! edges (files, JSON, player input) and callers generally log them and fall
//! back to defaults.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON document {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {name}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("player name must be 1-{max} characters, got {len}")]
    InvalidPlayerName { len: usize, max: usize },
}
