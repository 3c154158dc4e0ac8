//! Data-directory resolution and validation.
//!
//! # Responsibilities
//! - Resolve the on-disk data root for a named server subsystem
//! - Create the directory tree and prove it is writable
//! - Refuse double-initialization (the loader owns this lifecycle)

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Subdirectory key under which the server keeps its data.
pub const SERVER_DATA_SUBDIR: &str = "server";

/// Error type for data-directory resolution.
#[derive(Debug, Error)]
pub enum DataDirError {
    #[error("no platform data directory available and no override configured")]
    NoBaseDirectory,
    #[error("data directory {path:?} already initialized")]
    AlreadyInitialized { path: PathBuf },
    #[error("failed to create data directory {path:?}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("data directory {path:?} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Boundary for the process-wide data-directory singleton.
pub trait DataFolder: Send {
    /// Resolve and validate the data root for `key`.
    fn init(&mut self, key: &str) -> Result<PathBuf, DataDirError>;

    /// Whether a root has been resolved.
    fn is_initialized(&self) -> bool;

    /// The resolved root, if any.
    fn root(&self) -> Option<&Path>;
}

/// Host data directory, rooted at an explicit override or the platform
/// data directory.
#[derive(Debug, Default)]
pub struct DataDir {
    override_root: Option<PathBuf>,
    root: Option<PathBuf>,
}

impl DataDir {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self {
            override_root,
            root: None,
        }
    }

    fn base_dir(&self) -> Result<PathBuf, DataDirError> {
        if let Some(root) = &self.override_root {
            return Ok(root.clone());
        }
        dirs::data_dir()
            .map(|base| base.join("notaryd"))
            .ok_or(DataDirError::NoBaseDirectory)
    }
}

impl DataFolder for DataDir {
    fn init(&mut self, key: &str) -> Result<PathBuf, DataDirError> {
        if let Some(root) = &self.root {
            return Err(DataDirError::AlreadyInitialized { path: root.clone() });
        }

        let root = self.base_dir()?.join(key);
        fs::create_dir_all(&root).map_err(|source| DataDirError::Create {
            path: root.clone(),
            source,
        })?;

        // Prove the directory accepts new files before anything relies on it.
        let probe = root.join(".write-probe");
        fs::write(&probe, b"probe").map_err(|source| DataDirError::NotWritable {
            path: root.clone(),
            source,
        })?;
        let _ = fs::remove_file(&probe);

        tracing::debug!(path = %root.display(), "data directory validated");
        self.root = Some(root.clone());
        Ok(root)
    }

    fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
