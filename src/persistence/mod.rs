//! Save/load persistence for small JSON documents
//!
//! Features:
//! - One pretty-printed JSON file per document under a data directory
//! - Writes go to `<name>.tmp` first and are renamed over the old file
//! - Missing documents are not an error (first run)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Directory-backed JSON document store
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Load a document, `Ok(None)` if it has never been saved
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path_for(name);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Io { path, source }),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| Error::Json { path, source })
    }

    /// Save a document, replacing any previous version
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Io {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(value).map_err(|source| Error::Encode {
            name: name.to_string(),
            source,
        })?;

        let path = self.path_for(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, json).map_err(|source| Error::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| Error::Io { path, source })?;
        log::debug!("Saved {}", name);
        Ok(())
    }
}
