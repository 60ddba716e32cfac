//! Persisted selection
//!
//! The topic slug and level code survive restarts in a small JSON file.
//! A missing or unreadable file is never fatal: loading falls back to an
//! empty selection and logs why.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The part of the wizard selection kept between runs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSelection {
    /// Slug of the last main topic
    pub topic_slug: Option<String>,
    /// Code of the last level
    pub level_code: Option<String>,
}

/// Errors writing the selection file
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure
    #[error("Failed to write selection file at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Serialization failure
    #[error("Failed to encode selection: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the selection lives on disk (or nowhere, when disabled)
#[derive(Clone, Debug)]
pub struct SelectionStore {
    path: Option<PathBuf>,
}

impl SelectionStore {
    /// `$XDG_DATA_HOME/infou/selection.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("infou").join("selection.json"))
    }

    /// Store backed by `path`
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store at the default location, if the platform has one
    #[must_use]
    pub fn at_default_path() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Store that never reads or writes
    #[must_use]
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the persisted selection
    pub async fn load(&self) -> PersistedSelection {
        let Some(path) = &self.path else {
            return PersistedSelection::default();
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(selection) => {
                    tracing::debug!(path = %path.display(), "Restored selection");
                    selection
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed selection file");
                    PersistedSelection::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedSelection::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read selection file");
                PersistedSelection::default()
            }
        }
    }

    /// Write the selection
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the directory or file cannot be written.
    pub async fn save(&self, selection: &PersistedSelection) -> Result<(), PersistError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| PersistError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(selection)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}
