//! `ReminderPersistence` trait: the durable side of the reminder store.
//!
//! Backends only ever see a whole-store snapshot for the duration of one
//! `save` or `load` call; they hold no references into live state.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::reminders::model::{Reminder, ReminderId};

/// Largest id or counter value accepted from storage. Anything above it is
/// treated as a corrupt file, which keeps id arithmetic clear of overflow.
pub const MAX_STORED_ID: u64 = i64::MAX as u64;

/// All reminders belonging to one owner, plus the id counter that keeps ids unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OwnerRecordRepr")]
pub struct OwnerRecord {
    /// Next id to hand out. Persisted so ids of cleared reminders are never reused.
    pub next_id: u64,
    pub reminders: Vec<Reminder>,
}

impl OwnerRecord {
    /// Reserve a fresh id.
    pub fn allocate_id(&mut self) -> ReminderId {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = ReminderId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// On-disk shapes: the current `{next_id, reminders}` object, or the bare list older files used.
#[derive(Deserialize)]
#[serde(untagged)]
enum OwnerRecordRepr {
    Current {
        #[serde(default)]
        next_id: u64,
        reminders: Vec<Reminder>,
    },
    Legacy(Vec<Reminder>),
}

impl TryFrom<OwnerRecordRepr> for OwnerRecord {
    type Error = String;

    fn try_from(repr: OwnerRecordRepr) -> Result<Self, Self::Error> {
        let record = match repr {
            OwnerRecordRepr::Current { next_id, reminders } => Self { next_id, reminders },
            OwnerRecordRepr::Legacy(reminders) => Self {
                next_id: 0,
                reminders,
            },
        };

        if record.next_id > MAX_STORED_ID {
            return Err(format!("next_id {} is out of range", record.next_id));
        }
        if let Some(r) = record.reminders.iter().find(|r| r.id.0 > MAX_STORED_ID) {
            return Err(format!("reminder id {} is out of range", r.id.0));
        }
        Ok(record)
    }
}

/// Every owner's reminders, keyed by owner id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreSnapshot {
    pub owners: BTreeMap<String, OwnerRecord>,
}

impl StoreSnapshot {
    /// Repair a freshly loaded snapshot: fill owner ids, give id-less or duplicate
    /// records fresh ids, and move each counter past the highest id in use.
    ///
    /// Returns how many reminders were renumbered.
    pub fn normalize(&mut self) -> usize {
        let mut renumbered = 0;

        for (owner, record) in &mut self.owners {
            let max_id = record.reminders.iter().map(|r| r.id.0).max().unwrap_or(0);
            record.next_id = record.next_id.max(max_id + 1);

            let mut seen = HashSet::new();
            for reminder in &mut record.reminders {
                reminder.owner_id = owner.clone();
                if reminder.id == ReminderId::UNASSIGNED || !seen.insert(reminder.id) {
                    reminder.id = ReminderId(record.next_id);
                    record.next_id += 1;
                    seen.insert(reminder.id);
                    renumbered += 1;
                }
            }
        }

        renumbered
    }

    pub fn reminder_count(&self) -> usize {
        self.owners.values().map(|r| r.reminders.len()).sum()
    }
}

/// Durable storage for the reminder store.
#[async_trait]
pub trait ReminderPersistence: Send + Sync {
    /// Read the stored snapshot. A missing store is an empty snapshot, not an error.
    async fn load(&self) -> Result<StoreSnapshot, PersistenceError>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), PersistenceError>;
}
