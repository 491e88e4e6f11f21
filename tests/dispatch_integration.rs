//! Dispatch scheduler against a file-backed store, a manual clock, and
//! scripted notifiers.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use noticebot::clock::ManualClock;
use noticebot::dispatch::{DispatchConfig, DispatchScheduler, Notifier, spawn_dispatch_ticker};
use noticebot::error::ChannelError;
use noticebot::reminders::{Recurrence, ReminderStore, parse_due};
use noticebot::store::JsonFileBackend;

/// Fails the first `failures` calls, then records deliveries.
#[derive(Default)]
struct FlakyNotifier {
    failures: AtomicUsize,
    attempts: AtomicUsize,
    delivered: Mutex<Vec<(String, String)>>,
}

impl FlakyNotifier {
    fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            ..Self::default()
        }
    }

    fn delivered(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FlakyNotifier {
    async fn notify(&self, owner_id: &str, text: &str) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ChannelError::SendFailed {
                name: "flaky".into(),
                reason: "network down".into(),
            });
        }
        self.delivered
            .lock()
            .unwrap()
            .push((owner_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Never answers.
struct StuckNotifier;

#[async_trait]
impl Notifier for StuckNotifier {
    async fn notify(&self, _owner_id: &str, _text: &str) -> Result<(), ChannelError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

fn at(raw: &str) -> NaiveDateTime {
    parse_due(raw).unwrap()
}

struct Harness {
    _dir: tempfile::TempDir,
    path: std::path::PathBuf,
    store: Arc<ReminderStore>,
    clock: Arc<ManualClock>,
    scheduler: Arc<DispatchScheduler>,
}

async fn harness(now: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");
    let store = Arc::new(ReminderStore::open(Arc::new(JsonFileBackend::new(&path))).await);
    let clock = Arc::new(ManualClock::new(at(now)));
    let scheduler = Arc::new(DispatchScheduler::new(
        store.clone(),
        clock.clone(),
        DispatchConfig {
            tick_interval: Duration::from_millis(20),
            notify_timeout: Duration::from_millis(100),
        },
    ));
    Harness {
        _dir: dir,
        path,
        store,
        clock,
        scheduler,
    }
}

#[tokio::test]
async fn dispatch_is_at_least_once() {
    let h = harness("2025-01-01 12:00").await;
    let _ = h
        .store
        .add("1", "2025-01-01 09:00", "Call the bank", Recurrence::None)
        .await
        .unwrap();
    let notifier = Arc::new(FlakyNotifier::failing(1));
    h.scheduler.register_notifier(notifier.clone()).await;

    let first = h.scheduler.tick().await;
    assert_eq!((first.attempted, first.failed), (1, 1));
    assert_eq!(h.store.list_active("1").await.len(), 1);

    let second = h.scheduler.tick().await;
    assert_eq!((second.attempted, second.delivered), (1, 1));
    assert_eq!(notifier.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(
        notifier.delivered(),
        [("1".to_string(), "⏰ Reminder: Call the bank".to_string())]
    );

    let completed = h.store.list_completed("1").await;
    assert_eq!(completed.len(), 1);
    assert!(completed[0].sent);

    // Delivered state is on disk.
    let reopened = ReminderStore::open(Arc::new(JsonFileBackend::new(&h.path))).await;
    assert!(reopened.list_active("1").await.is_empty());
    assert_eq!(reopened.list_completed("1").await.len(), 1);
}

#[tokio::test]
async fn daily_reminder_rolls_over_each_day() {
    let h = harness("2025-01-01 09:00").await;
    let _ = h
        .store
        .add("1", "2025-01-01 09:00", "Pills", Recurrence::Daily)
        .await
        .unwrap();
    let notifier = Arc::new(FlakyNotifier::default());
    h.scheduler.register_notifier(notifier.clone()).await;

    assert_eq!(h.scheduler.tick().await.delivered, 1);
    let active = h.store.list_active("1").await;
    assert_eq!(active.len(), 1);
    assert!(!active[0].sent);
    assert_eq!(active[0].due_at, at("2025-01-02 09:00"));

    h.clock.advance(chrono::Duration::hours(12));
    assert_eq!(h.scheduler.tick().await.attempted, 0);

    h.clock.advance(chrono::Duration::hours(12));
    assert_eq!(h.scheduler.tick().await.delivered, 1);
    assert_eq!(h.store.list_active("1").await[0].due_at, at("2025-01-03 09:00"));
    assert_eq!(notifier.delivered().len(), 2);
}

#[tokio::test]
async fn monthly_is_thirty_days() {
    let h = harness("2025-01-31 08:00").await;
    let _ = h
        .store
        .add("1", "2025-01-31 08:00", "Rent", Recurrence::Monthly)
        .await
        .unwrap();
    h.scheduler
        .register_notifier(Arc::new(FlakyNotifier::default()))
        .await;

    let _ = h.scheduler.tick().await;
    assert_eq!(
        h.store.list_active("1").await[0].due_at,
        at("2025-03-02 08:00")
    );
}

#[tokio::test]
async fn stuck_notifier_counts_as_failure() {
    let h = harness("2025-01-01 12:00").await;
    let _ = h
        .store
        .add("1", "2025-01-01 09:00", "a", Recurrence::None)
        .await
        .unwrap();
    let _ = h
        .store
        .add("2", "2025-01-01 09:00", "b", Recurrence::None)
        .await
        .unwrap();
    h.scheduler.register_notifier(Arc::new(StuckNotifier)).await;

    let report = tokio::time::timeout(Duration::from_secs(5), h.scheduler.tick())
        .await
        .expect("tick must not hang");
    assert_eq!(report.attempted, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(h.store.list_active("1").await.len(), 1);
    assert_eq!(h.store.list_active("2").await.len(), 1);
}

#[tokio::test]
async fn edit_during_delivery_wins() {
    /// Moves the reminder into the future while "delivering" it.
    struct EditingNotifier {
        store: Arc<ReminderStore>,
    }

    #[async_trait]
    impl Notifier for EditingNotifier {
        async fn notify(&self, owner_id: &str, _text: &str) -> Result<(), ChannelError> {
            let _ = self
                .store
                .edit(owner_id, "1", "2025-02-01 09:00", "moved")
                .await
                .unwrap();
            Ok(())
        }
    }

    let h = harness("2025-01-01 12:00").await;
    let _ = h
        .store
        .add("1", "2025-01-01 09:00", "original", Recurrence::None)
        .await
        .unwrap();
    h.scheduler
        .register_notifier(Arc::new(EditingNotifier {
            store: h.store.clone(),
        }))
        .await;

    let report = h.scheduler.tick().await;
    assert_eq!(report.skipped, 1);

    let active = h.store.list_active("1").await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].text, "moved");
    assert_eq!(active[0].due_at, at("2025-02-01 09:00"));
}

#[tokio::test]
async fn background_ticker_delivers() {
    let h = harness("2025-01-01 12:00").await;
    let _ = h
        .store
        .add("1", "2025-01-01 09:00", "Stretch", Recurrence::None)
        .await
        .unwrap();
    let notifier = Arc::new(FlakyNotifier::default());
    h.scheduler.register_notifier(notifier.clone()).await;

    let ticker = spawn_dispatch_ticker(h.scheduler.clone());
    for _ in 0..100 {
        if !h.store.list_completed("1").await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    ticker.abort();

    assert_eq!(notifier.delivered().len(), 1);
    assert_eq!(h.store.list_completed("1").await.len(), 1);
}
