//! In-memory backend: keeps the last saved snapshot. Used for ephemeral runs and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::{ReminderPersistence, StoreSnapshot};
use crate::error::PersistenceError;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: RwLock<StoreSnapshot>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save fail with an IO error. Test support for the
    /// save-warning path.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far. Lets tests assert that no-op
    /// operations skip the write.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl ReminderPersistence for MemoryBackend {
    async fn load(&self) -> Result<StoreSnapshot, PersistenceError> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io {
                path: "<memory>".into(),
                source: std::io::Error::other("simulated save failure"),
            });
        }
        *self.snapshot.write().await = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
