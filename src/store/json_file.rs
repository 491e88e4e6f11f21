//! JSON file backend.
//!
//! One pretty-printed JSON document holds every owner's reminders. Saves write a
//! sibling `.tmp` file and rename it over the target, so a crash mid-write leaves
//! the previous file intact. A file that cannot be read or parsed at startup is
//! moved aside first; if even that fails, saves are refused so it is never
//! overwritten.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use super::traits::{ReminderPersistence, StoreSnapshot};
use crate::error::PersistenceError;

/// File-backed persistence for the reminder store.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    /// Set when an unreadable file could not be quarantined.
    save_blocked: AtomicBool,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            save_blocked: AtomicBool::new(false),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Where an unreadable file is moved so the next save cannot overwrite it.
    pub fn quarantine_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Move the unreadable file out of the way, or block saves if it cannot be moved.
    async fn quarantine(&self) {
        let target = self.quarantine_path();
        match fs::rename(&self.path, &target).await {
            Ok(()) => error!(
                path = %self.path.display(),
                moved_to = %target.display(),
                "Unreadable reminder file quarantined"
            ),
            Err(e) => {
                self.save_blocked.store(true, Ordering::SeqCst);
                error!(
                    path = %self.path.display(),
                    "Failed to quarantine unreadable reminder file, saves disabled: {}", e
                );
            }
        }
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[async_trait]
impl ReminderPersistence for JsonFileBackend {
    async fn load(&self) -> Result<StoreSnapshot, PersistenceError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No reminder file yet, starting empty");
                return Ok(StoreSnapshot::default());
            }
            Err(e) => {
                self.quarantine().await;
                return Err(self.io_error(&self.path, e));
            }
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(StoreSnapshot::default());
        }

        match serde_json::from_slice::<StoreSnapshot>(&content) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                self.quarantine().await;
                Err(PersistenceError::Corrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), PersistenceError> {
        if self.save_blocked.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unread {
                path: self.path.clone(),
            });
        }

        let content = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(parent, e))?;
        }

        let temp_path = self.sibling(".tmp");
        if let Err(e) = write_synced(&temp_path, content.as_bytes()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(self.io_error(&temp_path, e));
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(self.io_error(&self.path, e));
        }

        debug!(
            path = %self.path.display(),
            reminders = snapshot.reminder_count(),
            "Reminder file saved"
        );
        Ok(())
    }
}
