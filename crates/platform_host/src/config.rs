//! Typed TOML configuration loading.

use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration loading failures.
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {reason}")]
    Read {
        /// Config path as displayed to the user.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },
    /// The file is not valid TOML for the expected shape.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// Config path as displayed to the user.
        path: String,
        /// Underlying parse error text.
        reason: String,
    },
}

/// Generic TOML-backed config loader.
///
/// `ConfigLoader<T>` handles only filesystem access and TOML deserialization. Semantic
/// validation stays with the consuming type.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Creates a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Creates a loader for a path relative to `root`.
    pub fn relative_to(root: &Path, relative_path: &str) -> Self {
        Self::new(root.join(relative_path))
    }

    /// Loads and deserializes the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for missing or unreadable files and [`ConfigError::Parse`]
    /// for TOML that does not match `T`.
    pub fn load(&self) -> Result<T, ConfigError> {
        let body = fs::read_to_string(&self.path).map_err(|err| ConfigError::Read {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::parse(&body, &self.path)
    }

    /// Loads the file when it exists, otherwise returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
    pub fn load_optional(&self) -> Result<Option<T>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    /// Config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(body: &str, path: &Path) -> Result<T, ConfigError> {
        toml::from_str(body).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }
}
