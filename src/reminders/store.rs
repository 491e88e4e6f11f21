//! Reminder store: the single owner and mutator of reminder state.
//!
//! All state sits behind one async mutex. Every operation takes the lock once,
//! works against that single view of the data, persists while still holding the
//! lock, and only then returns. A caller that gets a response therefore knows the
//! change reached the backend (or gets the save failure as a warning).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::model::{
    DoneReport, Persisted, Recurrence, Reminder, ReminderId, ReminderLists, parse_due,
};
use super::recurrence::next_due;
use crate::error::{EditError, PositionError, ValidationError};
use crate::store::{OwnerRecord, ReminderPersistence, StoreSnapshot};

pub struct ReminderStore {
    state: Mutex<StoreSnapshot>,
    persistence: Arc<dyn ReminderPersistence>,
}

impl ReminderStore {
    /// Open the store from its backend.
    ///
    /// A load failure is logged and the store starts empty; it never blocks startup.
    pub async fn open(persistence: Arc<dyn ReminderPersistence>) -> Self {
        let snapshot = match persistence.load().await {
            Ok(mut snapshot) => {
                let renumbered = snapshot.normalize();
                if renumbered > 0 {
                    info!(count = renumbered, "Assigned ids to stored reminders");
                }
                info!(
                    owners = snapshot.owners.len(),
                    reminders = snapshot.reminder_count(),
                    "Reminder store loaded"
                );
                snapshot
            }
            Err(e) => {
                warn!("Failed to load reminders, starting with an empty store: {}", e);
                StoreSnapshot::default()
            }
        };

        Self {
            state: Mutex::new(snapshot),
            persistence,
        }
    }

    async fn persist<T>(&self, state: &StoreSnapshot, value: T) -> Persisted<T> {
        match self.persistence.save(state).await {
            Ok(()) => Persisted::clean(value),
            Err(e) => {
                warn!("Failed to persist reminders: {}", e);
                Persisted {
                    value,
                    warning: Some(e),
                }
            }
        }
    }

    /// Create a reminder. Input is validated before anything is touched.
    pub async fn add(
        &self,
        owner_id: &str,
        raw_due: &str,
        text: &str,
        recurrence: Recurrence,
    ) -> Result<Persisted<Reminder>, ValidationError> {
        let due_at = parse_due(raw_due)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let mut state = self.state.lock().await;
        let record = state.owners.entry(owner_id.to_string()).or_default();
        let reminder = Reminder {
            id: record.allocate_id(),
            owner_id: owner_id.to_string(),
            due_at,
            text: text.to_string(),
            recurrence,
            sent: false,
        };
        record.reminders.push(reminder.clone());

        info!(
            owner = %owner_id,
            reminder_id = %reminder.id,
            due_at = %reminder.due_at,
            recurrence = %reminder.recurrence,
            "Reminder added"
        );

        Ok(self.persist(&state, reminder).await)
    }

    /// Active reminders, earliest first.
    pub async fn list_active(&self, owner_id: &str) -> Vec<Reminder> {
        let state = self.state.lock().await;
        active_view(state.owners.get(owner_id))
    }

    /// Completed reminders, earliest first.
    pub async fn list_completed(&self, owner_id: &str) -> Vec<Reminder> {
        let state = self.state.lock().await;
        completed_view(state.owners.get(owner_id))
    }

    /// Both views from a single lock hold.
    pub async fn lists(&self, owner_id: &str) -> ReminderLists {
        let state = self.state.lock().await;
        let record = state.owners.get(owner_id);
        ReminderLists {
            active: active_view(record),
            completed: completed_view(record),
        }
    }

    /// Complete reminders by 1-based position in the active view.
    ///
    /// Positions are resolved against the view as it was when the call started, so
    /// `/done 1 2` completes the first two reminders the user saw. Bad tokens are
    /// reported, good ones applied, and the store saves once.
    pub async fn mark_done<S: AsRef<str>>(
        &self,
        owner_id: &str,
        tokens: &[S],
    ) -> Persisted<DoneReport> {
        let mut state = self.state.lock().await;
        let view = active_ids(state.owners.get(owner_id));

        let mut report = DoneReport::default();
        let mut targets = Vec::new();
        let mut seen = HashSet::new();
        for token in tokens {
            match resolve_position(token.as_ref(), &view) {
                Ok(id) => {
                    if seen.insert(id) {
                        targets.push(id);
                    }
                }
                Err(e) => report.invalid.push(e),
            }
        }

        if targets.is_empty() {
            return Persisted::clean(report);
        }

        if let Some(record) = state.owners.get_mut(owner_id) {
            for id in &targets {
                if let Some(reminder) = record.reminders.iter_mut().find(|r| r.id == *id) {
                    reminder.sent = true;
                    report.completed.push(reminder.text.clone());
                }
            }
        }

        info!(
            owner = %owner_id,
            completed = report.completed.len(),
            rejected = report.invalid.len(),
            "Reminders marked done"
        );

        self.persist(&state, report).await
    }

    /// Complete one active reminder by id. `None` if it is not active (anymore).
    pub async fn mark_done_by_id(
        &self,
        owner_id: &str,
        id: ReminderId,
    ) -> Option<Persisted<Reminder>> {
        let mut state = self.state.lock().await;
        let reminder = state
            .owners
            .get_mut(owner_id)?
            .reminders
            .iter_mut()
            .find(|r| r.id == id && r.is_active())?;
        reminder.sent = true;
        let done = reminder.clone();

        info!(owner = %owner_id, reminder_id = %id, "Reminder marked done");
        Some(self.persist(&state, done).await)
    }

    /// Remove every completed reminder. Returns how many were removed.
    pub async fn clear_completed(&self, owner_id: &str) -> Persisted<usize> {
        let mut state = self.state.lock().await;
        let Some(record) = state.owners.get_mut(owner_id) else {
            return Persisted::clean(0);
        };

        let before = record.reminders.len();
        record.reminders.retain(Reminder::is_active);
        let removed = before - record.reminders.len();

        if removed == 0 {
            return Persisted::clean(0);
        }

        info!(owner = %owner_id, count = removed, "Completed reminders cleared");
        self.persist(&state, removed).await
    }

    /// Replace due time and text of the active reminder at `position` (1-based).
    /// Recurrence is left as it was.
    pub async fn edit(
        &self,
        owner_id: &str,
        position: &str,
        raw_due: &str,
        new_text: &str,
    ) -> Result<Persisted<Reminder>, EditError> {
        let mut state = self.state.lock().await;
        let view = active_ids(state.owners.get(owner_id));
        let id = resolve_position(position, &view)?;

        let due_at = parse_due(raw_due).map_err(|_| EditError::BadTimeFormat {
            input: raw_due.trim().to_string(),
        })?;
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(EditError::BadSyntax {
                reason: "reminder text is empty".into(),
            });
        }

        let reminder = state
            .owners
            .get_mut(owner_id)
            .and_then(|record| record.reminders.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| EditError::BadPosition {
                token: position.trim().to_string(),
            })?;
        reminder.due_at = due_at;
        reminder.text = new_text.to_string();
        let updated = reminder.clone();

        info!(owner = %owner_id, reminder_id = %id, due_at = %due_at, "Reminder edited");
        Ok(self.persist(&state, updated).await)
    }

    /// Every reminder, across all owners, that is unsent and due at `now`.
    pub async fn due_reminders(&self, now: NaiveDateTime) -> Vec<Reminder> {
        let state = self.state.lock().await;
        let mut due: Vec<Reminder> = state
            .owners
            .values()
            .flat_map(|record| record.reminders.iter())
            .filter(|r| r.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));
        due
    }

    /// Record a successful delivery.
    ///
    /// Sets `sent`; a recurring reminder then moves to its next due time and is
    /// active again under the same id. Returns `None` without writing if the
    /// reminder is gone, already completed, or was moved into the future while
    /// the delivery was in flight.
    pub async fn mark_sent_and_reschedule(
        &self,
        owner_id: &str,
        id: ReminderId,
        now: NaiveDateTime,
    ) -> Option<Persisted<Reminder>> {
        let mut state = self.state.lock().await;
        let Some(reminder) = find_mut(&mut state, owner_id, id) else {
            debug!(owner = %owner_id, reminder_id = %id, "Delivered reminder no longer exists");
            return None;
        };
        if !reminder.is_due(now) {
            debug!(
                owner = %owner_id,
                reminder_id = %id,
                "Reminder changed during delivery, leaving it as is"
            );
            return None;
        }

        reminder.sent = true;
        if reminder.recurrence.is_recurring() {
            match next_due(reminder.due_at, reminder.recurrence) {
                Some(next) => {
                    reminder.due_at = next;
                    reminder.sent = false;
                }
                None => warn!(
                    owner = %owner_id,
                    reminder_id = %id,
                    "Next occurrence out of range, recurrence stopped"
                ),
            }
        }
        let updated = reminder.clone();

        debug!(
            owner = %owner_id,
            reminder_id = %id,
            sent = updated.sent,
            due_at = %updated.due_at,
            "Delivery recorded"
        );
        Some(self.persist(&state, updated).await)
    }

    /// Copy of the whole store.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.clone()
    }
}

fn find_mut<'a>(
    state: &'a mut StoreSnapshot,
    owner_id: &str,
    id: ReminderId,
) -> Option<&'a mut Reminder> {
    state
        .owners
        .get_mut(owner_id)?
        .reminders
        .iter_mut()
        .find(|r| r.id == id)
}

fn sorted_view(record: Option<&OwnerRecord>, active: bool) -> Vec<Reminder> {
    let mut view: Vec<Reminder> = record
        .map(|r| r.reminders.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|r| r.is_active() == active)
        .cloned()
        .collect();
    view.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));
    view
}

fn active_view(record: Option<&OwnerRecord>) -> Vec<Reminder> {
    sorted_view(record, true)
}

fn completed_view(record: Option<&OwnerRecord>) -> Vec<Reminder> {
    sorted_view(record, false)
}

fn active_ids(record: Option<&OwnerRecord>) -> Vec<ReminderId> {
    active_view(record).into_iter().map(|r| r.id).collect()
}

/// Resolve a 1-based position token against a view snapshot.
fn resolve_position(token: &str, view: &[ReminderId]) -> Result<ReminderId, PositionError> {
    let trimmed = token.trim();
    let position: usize = trimmed.parse().map_err(|_| PositionError::NotANumber {
        token: trimmed.to_string(),
    })?;
    position
        .checked_sub(1)
        .and_then(|index| view.get(index))
        .copied()
        .ok_or_else(|| PositionError::OutOfRange {
            token: trimmed.to_string(),
            position,
            len: view.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditErrorKind;
    use crate::store::MemoryBackend;

    async fn store() -> (ReminderStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = ReminderStore::open(backend.clone()).await;
        (store, backend)
    }

    fn at(raw: &str) -> NaiveDateTime {
        parse_due(raw).unwrap()
    }

    #[tokio::test]
    async fn add_then_list_active() {
        let (store, backend) = store().await;
        let added = store
            .add("1", "2025-09-20 10:00", "Stretch", Recurrence::None)
            .await
            .unwrap();
        assert!(added.is_clean());

        let active = store.list_active("1").await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "Stretch");
        assert_eq!(active[0].due_at, at("2025-09-20 10:00"));
        assert!(!active[0].sent);
        assert_eq!(backend.save_count(), 1);
    }

    #[tokio::test]
    async fn add_rejects_bad_input_without_mutating() {
        let (store, backend) = store().await;
        let err = store
            .add("1", "2025-09-20", "Stretch", Recurrence::None)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::BadTimeFormat { .. }));

        let err = store
            .add("1", "2025-09-20 10:00", "   ", Recurrence::None)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyText);

        assert!(store.list_active("1").await.is_empty());
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn ids_are_unique_and_never_reused() {
        let (store, _) = store().await;
        let a = store
            .add("1", "2025-09-20 10:00", "a", Recurrence::None)
            .await
            .unwrap()
            .into_value();
        let b = store
            .add("1", "2025-09-20 11:00", "b", Recurrence::None)
            .await
            .unwrap()
            .into_value();
        assert_ne!(a.id, b.id);

        let _ = store.mark_done("1", &["1", "2"]).await;
        assert_eq!(store.clear_completed("1").await.into_value(), 2);

        let c = store
            .add("1", "2025-09-20 12:00", "c", Recurrence::None)
            .await
            .unwrap()
            .into_value();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn ids_are_scoped_per_owner() {
        let (store, _) = store().await;
        let a = store
            .add("1", "2025-09-20 10:00", "a", Recurrence::None)
            .await
            .unwrap()
            .into_value();
        let b = store
            .add("2", "2025-09-20 10:00", "b", Recurrence::None)
            .await
            .unwrap()
            .into_value();
        assert_eq!(a.id, ReminderId(1));
        assert_eq!(b.id, ReminderId(1));
        assert!(store.list_active("3").await.is_empty());
    }

    #[tokio::test]
    async fn active_view_is_sorted_by_due_time() {
        let (store, _) = store().await;
        for (due, text) in [
            ("2025-09-22 08:00", "third"),
            ("2025-09-20 08:00", "first"),
            ("2025-09-21 08:00", "second"),
        ] {
            let _ = store.add("1", due, text, Recurrence::None).await.unwrap();
        }
        let texts: Vec<String> = store
            .list_active("1")
            .await
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn batch_done_with_invalid_token() {
        let (store, backend) = store().await;
        let _ = store
            .add("1", "2025-09-20 10:00", "first", Recurrence::None)
            .await
            .unwrap();
        let _ = store
            .add("1", "2025-09-21 10:00", "second", Recurrence::None)
            .await
            .unwrap();
        let saves_before = backend.save_count();

        let report = store.mark_done("1", &["1", "9"]).await.into_value();
        assert_eq!(report.completed, ["first"]);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].token(), "9");
        assert_eq!(backend.save_count(), saves_before + 1);

        let active = store.list_active("1").await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "second");
    }

    #[tokio::test]
    async fn batch_done_resolves_against_one_snapshot() {
        let (store, _) = store().await;
        for (due, text) in [
            ("2025-09-20 10:00", "a"),
            ("2025-09-21 10:00", "b"),
            ("2025-09-22 10:00", "c"),
        ] {
            let _ = store.add("1", due, text, Recurrence::None).await.unwrap();
        }

        // Completing 1 must not shift what 2 refers to.
        let report = store.mark_done("1", &["1", "2"]).await.into_value();
        assert_eq!(report.completed, ["a", "b"]);
        let active = store.list_active("1").await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "c");
    }

    #[tokio::test]
    async fn batch_done_ignores_duplicates_and_rejects_garbage() {
        let (store, backend) = store().await;
        let _ = store
            .add("1", "2025-09-20 10:00", "a", Recurrence::None)
            .await
            .unwrap();

        let report = store.mark_done("1", &["1", "1", "x", "0"]).await.into_value();
        assert_eq!(report.completed, ["a"]);
        let tokens: Vec<&str> = report.invalid.iter().map(|e| e.token()).collect();
        assert_eq!(tokens, ["x", "0"]);
        assert!(matches!(report.invalid[0], PositionError::NotANumber { .. }));

        // Nothing valid left: no save.
        let saves = backend.save_count();
        let report = store.mark_done("1", &["1"]).await.into_value();
        assert!(report.completed.is_empty());
        assert_eq!(backend.save_count(), saves);
    }

    #[tokio::test]
    async fn active_and_completed_partition_all_reminders() {
        let (store, backend) = store().await;
        for (due, text) in [
            ("2025-09-20 10:00", "a"),
            ("2025-09-21 10:00", "b"),
            ("2025-09-22 10:00", "c"),
        ] {
            let _ = store.add("1", due, text, Recurrence::None).await.unwrap();
        }
        let _ = store.mark_done("1", &["2"]).await;

        let lists = store.lists("1").await;
        let active: HashSet<ReminderId> = lists.active.iter().map(|r| r.id).collect();
        let completed: HashSet<ReminderId> = lists.completed.iter().map(|r| r.id).collect();
        assert!(active.is_disjoint(&completed));

        let all: HashSet<ReminderId> = backend.snapshot().await.owners["1"]
            .reminders
            .iter()
            .map(|r| r.id)
            .collect();
        let union: HashSet<ReminderId> = active.union(&completed).copied().collect();
        assert_eq!(union, all);
    }

    #[tokio::test]
    async fn clear_completed_is_idempotent() {
        let (store, _) = store().await;
        let _ = store
            .add("1", "2025-09-20 10:00", "a", Recurrence::None)
            .await
            .unwrap();
        let _ = store
            .add("1", "2025-09-21 10:00", "b", Recurrence::None)
            .await
            .unwrap();
        let _ = store.mark_done("1", &["1"]).await;

        assert_eq!(store.clear_completed("1").await.into_value(), 1);
        assert_eq!(store.clear_completed("1").await.into_value(), 0);
        assert_eq!(store.clear_completed("unknown").await.into_value(), 0);
        assert_eq!(store.list_active("1").await.len(), 1);
    }

    #[tokio::test]
    async fn edit_replaces_due_and_text_but_not_recurrence() {
        let (store, _) = store().await;
        let original = store
            .add("1", "2025-09-20 10:00", "Stretch", Recurrence::Weekly)
            .await
            .unwrap()
            .into_value();

        let updated = store
            .edit("1", "1", "2025-09-17 12:00", " Call a friend ")
            .await
            .unwrap()
            .into_value();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.due_at, at("2025-09-17 12:00"));
        assert_eq!(updated.text, "Call a friend");
        assert_eq!(updated.recurrence, Recurrence::Weekly);
    }

    #[tokio::test]
    async fn edit_rejects_bad_format_and_leaves_reminder_unchanged() {
        let (store, _) = store().await;
        let original = store
            .add("1", "2025-09-20 10:00", "Stretch", Recurrence::None)
            .await
            .unwrap()
            .into_value();

        let err = store
            .edit("1", "1", "not-a-date", "text")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EditErrorKind::BadTimeFormat);

        let active = store.list_active("1").await;
        assert_eq!(active, vec![original]);
    }

    #[tokio::test]
    async fn edit_rejects_bad_position_and_empty_text() {
        let (store, _) = store().await;
        let _ = store
            .add("1", "2025-09-20 10:00", "Stretch", Recurrence::None)
            .await
            .unwrap();

        let err = store
            .edit("1", "2", "2025-09-20 11:00", "x")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EditErrorKind::BadPosition);

        let err = store
            .edit("1", "one", "2025-09-20 11:00", "x")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EditErrorKind::BadPosition);

        let err = store
            .edit("1", "1", "2025-09-20 11:00", "  ")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), EditErrorKind::BadSyntax);
    }

    #[tokio::test]
    async fn edit_only_addresses_active_reminders() {
        let (store, _) = store().await;
        let _ = store
            .add("1", "2025-09-20 10:00", "done one", Recurrence::None)
            .await
            .unwrap();
        let _ = store
            .add("1", "2025-09-21 10:00", "open one", Recurrence::None)
            .await
            .unwrap();
        let _ = store.mark_done("1", &["1"]).await;

        let updated = store
            .edit("1", "1", "2025-09-25 10:00", "moved")
            .await
            .unwrap()
            .into_value();
        assert_eq!(updated.id, ReminderId(2));
        assert_eq!(store.list_completed("1").await[0].text, "done one");
    }

    #[tokio::test]
    async fn mark_done_by_id_only_hits_active() {
        let (store, _) = store().await;
        let added = store
            .add("1", "2025-09-20 10:00", "a", Recurrence::None)
            .await
            .unwrap()
            .into_value();

        assert!(store.mark_done_by_id("1", added.id).await.is_some());
        assert!(store.mark_done_by_id("1", added.id).await.is_none());
        assert!(store.mark_done_by_id("2", added.id).await.is_none());
    }

    #[tokio::test]
    async fn daily_rollover_keeps_id_and_reactivates() {
        let (store, _) = store().await;
        let added = store
            .add("1", "2025-01-01 09:00", "Pills", Recurrence::Daily)
            .await
            .unwrap()
            .into_value();

        let rolled = store
            .mark_sent_and_reschedule("1", added.id, at("2025-01-01 09:00"))
            .await
            .unwrap()
            .into_value();
        assert_eq!(rolled.id, added.id);
        assert!(!rolled.sent);
        assert_eq!(rolled.due_at, at("2025-01-02 09:00"));
    }

    #[tokio::test]
    async fn one_shot_delivery_completes() {
        let (store, _) = store().await;
        let added = store
            .add("1", "2025-01-01 09:00", "Call", Recurrence::None)
            .await
            .unwrap()
            .into_value();

        let delivered = store
            .mark_sent_and_reschedule("1", added.id, at("2025-01-01 09:05"))
            .await
            .unwrap()
            .into_value();
        assert!(delivered.sent);
        assert_eq!(delivered.due_at, added.due_at);
        assert!(store.list_active("1").await.is_empty());
    }

    #[tokio::test]
    async fn reschedule_skips_reminder_moved_during_delivery() {
        let (store, _) = store().await;
        let added = store
            .add("1", "2025-01-01 09:00", "Call", Recurrence::None)
            .await
            .unwrap()
            .into_value();
        let _ = store
            .edit("1", "1", "2025-02-01 09:00", "Call later")
            .await
            .unwrap();

        let result = store
            .mark_sent_and_reschedule("1", added.id, at("2025-01-01 09:00"))
            .await;
        assert!(result.is_none());
        assert_eq!(store.list_active("1").await.len(), 1);
    }

    #[tokio::test]
    async fn due_reminders_spans_owners_and_skips_sent() {
        let (store, _) = store().await;
        let _ = store
            .add("1", "2025-01-01 09:00", "a", Recurrence::None)
            .await
            .unwrap();
        let _ = store
            .add("2", "2025-01-01 08:00", "b", Recurrence::None)
            .await
            .unwrap();
        let _ = store
            .add("2", "2025-01-03 08:00", "future", Recurrence::None)
            .await
            .unwrap();
        let _ = store
            .add("3", "2025-01-01 07:00", "done", Recurrence::None)
            .await
            .unwrap();
        let _ = store.mark_done("3", &["1"]).await;

        let due = store.due_reminders(at("2025-01-01 09:00")).await;
        let texts: Vec<&str> = due.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["b", "a"]);
    }

    #[tokio::test]
    async fn save_failure_is_reported_not_swallowed() {
        let (store, backend) = store().await;
        backend.set_fail_saves(true);

        let added = store
            .add("1", "2025-09-20 10:00", "Stretch", Recurrence::None)
            .await
            .unwrap();
        assert!(added.warning.is_some());
        // The change is still visible in memory.
        assert_eq!(store.list_active("1").await.len(), 1);

        backend.set_fail_saves(false);
        let cleared = store.clear_completed("1").await;
        assert!(cleared.is_clean());
    }

    #[tokio::test]
    async fn open_restores_previous_state() {
        let backend = Arc::new(MemoryBackend::new());
        {
            let store = ReminderStore::open(backend.clone()).await;
            let _ = store
                .add("1", "2025-09-20 10:00", "Stretch", Recurrence::Monthly)
                .await
                .unwrap();
        }

        let reopened = ReminderStore::open(backend).await;
        let active = reopened.list_active("1").await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].owner_id, "1");
        assert_eq!(active[0].recurrence, Recurrence::Monthly);
    }
}
