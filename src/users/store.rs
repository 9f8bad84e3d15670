//! Whole-collection persistence for [`User`] records.

use super::{StoreError, User};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Backing medium for the user list.
///
/// `load_all` never fails: a missing or unreadable medium is an empty list.
/// `save_all` replaces everything that was there before.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load_all(&self) -> Vec<User>;

    /// # Errors
    /// Returns an error if the users cannot be serialized or written.
    async fn save_all(&self, users: &[User]) -> Result<(), StoreError>;

    /// Cheap reachability check used by `/health`.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be reached.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// JSON array in a single file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> Vec<User> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("users file not found, starting empty");
                return Vec::new();
            }
            Err(err) => {
                warn!("Failed to read users file: {}", err);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<User>>(&data) {
            Ok(users) => {
                debug!("loaded {} users", users.len());
                users
            }
            Err(err) => {
                warn!("Users file is not a valid user list: {}", err);
                Vec::new()
            }
        }
    }

    #[instrument(skip(self, users), fields(path = %self.path.display(), count = users.len()))]
    async fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(users)?;

        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.write_error(err))?;
        }

        // Write next to the target and rename so readers never see a partial file.
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|err| self.write_error(err))?;

        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.write_error(err));
        }

        debug!("users file saved");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::Unavailable {
                path: dir.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            }),
            Err(source) => Err(StoreError::Unavailable {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }
}

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn load_all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    async fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        *self.users.write().await = users.to_vec();
        Ok(())
    }
}
