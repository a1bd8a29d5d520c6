//! Durable storage for the bearer token.
//!
//! Only the token survives a restart; profile data is always re-fetched.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Fixed key the token is persisted under.
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read/write access to the persisted bearer token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load_token(&self) -> Option<String>;
    fn save_token(&self, token: &str) -> Result<(), StorageError>;
    fn clear_token(&self) -> Result<(), StorageError>;
}

/// Token persisted as a single file named [`TOKEN_STORAGE_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_STORAGE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load_token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Failed to read token from {}: {err}", self.path.display());
                None
            }
        }
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        *self.token.lock() = None;
        Ok(())
    }
}
