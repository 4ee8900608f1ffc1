//! Durable client-side storage.
//!
//! The client persists exactly one value across runs: whether notification
//! sounds are enabled. It lives in `storage.toml` in the user's data
//! directory, apart from the configuration file the user edits by hand.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};

/// Errors that can occur while reading or writing the stored preferences.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to determine the user's data directory.
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the storage file.
    #[error("failed to access storage: {0}")]
    IoError(#[from] std::io::Error),
    /// The storage file is not valid TOML or has an unexpected structure.
    #[error("failed to deserialize storage: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// Failed to serialize the preferences.
    #[error("failed to serialize storage: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

fn enabled() -> bool {
    true
}

/// On-disk layout of the storage file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
struct StoredPreferences {
    #[serde(default = "enabled")]
    sound_enabled: bool,
}

/// Handle to the storage file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Storage kept at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage kept in the user's data directory.
    pub fn default_location() -> Result<Self, StorageError> {
        match ProjectDirs::from("dev", "cherrydine", "cherrydine") {
            Some(dirs) => Ok(Self::at(dirs.data_dir().join("storage.toml"))),
            None => Err(StorageError::DirectoriesNotFound),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored sound preference. Sounds are enabled unless the
    /// storage explicitly says otherwise, so a missing or unreadable file
    /// enables them.
    pub async fn load_sound_enabled(&self) -> bool {
        match self.read().await {
            Ok(Some(preferences)) => preferences.sound_enabled,
            Ok(None) => enabled(),
            Err(e) => {
                log::warn!("Ignoring unreadable storage at {:?}: {e}", self.path);
                enabled()
            }
        }
    }

    /// Persists the sound preference, replacing the previous value.
    pub async fn save_sound_enabled(&self, sound_enabled: bool) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(&StoredPreferences { sound_enabled })?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;

        Ok(())
    }

    async fn read(&self) -> Result<Option<StoredPreferences>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = read_to_string(&self.path).await?;
        Ok(Some(toml::from_str(&contents)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_storage_enables_sound() {
        let directory = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(directory.path().join("storage.toml"));
        assert!(store.load_sound_enabled().await);
    }

    #[tokio::test]
    async fn saved_preference_is_recovered() {
        let directory = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(directory.path().join("profile").join("storage.toml"));

        store.save_sound_enabled(false).await.unwrap();
        assert!(!PreferenceStore::at(store.path()).load_sound_enabled().await);

        store.save_sound_enabled(true).await.unwrap();
        assert!(PreferenceStore::at(store.path()).load_sound_enabled().await);
    }

    #[tokio::test]
    async fn corrupted_storage_enables_sound() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("storage.toml");
        tokio::fs::write(&path, "sound_enabled = maybe").await.unwrap();

        assert!(PreferenceStore::at(path).load_sound_enabled().await);
    }

    #[tokio::test]
    async fn storage_holds_a_single_key() {
        let directory = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(directory.path().join("storage.toml"));
        store.save_sound_enabled(false).await.unwrap();

        let contents = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(contents.trim(), "sound_enabled = false");
    }
}
