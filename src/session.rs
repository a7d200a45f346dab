//! Bearer credential storage
//!
//! The API client reads the token before each request; the 401 path and the
//! login/logout flow write it. Stores are shared as `Arc<dyn CredentialStore>`.

use crate::error::{AppError, AppResult};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub const TOKEN_PATH_ENV: &str = "HABITCAL_TOKEN_PATH";

pub trait CredentialStore: Send + Sync {
    /// Currently stored token, if any
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> AppResult<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> AppResult<()>;

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Process-local store, used by tests and when no config directory exists.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token<S: Into<String>>(token: S) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> AppResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| AppError::storage("credential lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| AppError::storage("credential lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Token persisted in a single file, one line, no trailing data.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `HABITCAL_TOKEN_PATH` if set, else `<config dir>/habitcal/token`.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(TOKEN_PATH_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        dirs::config_dir().map(|dir| dir.join("habitcal").join("token"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read credential file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, token.trim()).map_err(|e| {
            AppError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        // Owner-only; the file holds a bearer credential
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AppError::storage(format!(
                    "Failed to restrict permissions on {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        }
        debug!("Stored credential at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed credential at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
