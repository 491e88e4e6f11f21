//! Dispatch scheduler: periodic scan for due reminders.
//!
//! Each tick reads the clock once, snapshots the due reminders, and hands each
//! one to the registered [`Notifier`] outside the store lock. Only a successful
//! delivery is written back; failures and timeouts leave the reminder unsent
//! for the next tick to retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::notifier::Notifier;
use crate::clock::Clock;
use crate::error::ChannelError;
use crate::reminders::{Reminder, ReminderStore};

/// Scheduler timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Period between scans.
    pub tick_interval: Duration,
    /// Upper bound on a single Notifier call.
    pub notify_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
            notify_timeout: Duration::from_secs(10),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Due reminders handed to the notifier.
    pub attempted: usize,
    /// Deliveries recorded in the store.
    pub delivered: usize,
    /// Notifier errors and timeouts. Retried next tick.
    pub failed: usize,
    /// Delivered, but the reminder changed meanwhile so nothing was written.
    pub skipped: usize,
}

/// Text sent to the owner when a reminder fires.
pub fn render_notification(reminder: &Reminder) -> String {
    format!("⏰ Reminder: {}", reminder.text)
}

pub struct DispatchScheduler {
    store: Arc<ReminderStore>,
    clock: Arc<dyn Clock>,
    config: DispatchConfig,
    notifier: RwLock<Option<Arc<dyn Notifier>>>,
    scanning: AtomicBool,
}

/// Clears the scanning flag when a tick ends, however it ends.
struct ScanGuard<'a>(&'a AtomicBool);

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DispatchScheduler {
    pub fn new(store: Arc<ReminderStore>, clock: Arc<dyn Clock>, config: DispatchConfig) -> Self {
        Self {
            store,
            clock,
            config,
            notifier: RwLock::new(None),
            scanning: AtomicBool::new(false),
        }
    }

    /// Install the delivery callback, replacing any previous one.
    pub async fn register_notifier(&self, notifier: Arc<dyn Notifier>) {
        *self.notifier.write().await = Some(notifier);
        debug!("Notifier registered");
    }

    /// True while a tick is in progress.
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Run one scan. A call made while another tick is still running returns an
    /// empty report without doing anything.
    pub async fn tick(&self) -> TickReport {
        if self.scanning.swap(true, Ordering::AcqRel) {
            debug!("Previous dispatch tick still running, skipping");
            return TickReport::default();
        }
        let _guard = ScanGuard(&self.scanning);

        let Some(notifier) = self.notifier.read().await.clone() else {
            debug!("No notifier registered, nothing dispatched");
            return TickReport::default();
        };

        let now = self.clock.now();
        let due = self.store.due_reminders(now).await;
        let mut report = TickReport::default();

        for reminder in due {
            report.attempted += 1;
            let text = render_notification(&reminder);

            if let Err(e) = self.deliver(notifier.as_ref(), &reminder, &text).await {
                warn!(
                    owner = %reminder.owner_id,
                    reminder_id = %reminder.id,
                    "Reminder delivery failed, will retry: {}", e
                );
                report.failed += 1;
                continue;
            }

            match self
                .store
                .mark_sent_and_reschedule(&reminder.owner_id, reminder.id, now)
                .await
            {
                Some(_) => report.delivered += 1,
                None => report.skipped += 1,
            }
        }

        if report.attempted > 0 {
            info!(
                attempted = report.attempted,
                delivered = report.delivered,
                failed = report.failed,
                skipped = report.skipped,
                "Dispatch tick finished"
            );
        }
        report
    }

    async fn deliver(
        &self,
        notifier: &dyn Notifier,
        reminder: &Reminder,
        text: &str,
    ) -> Result<(), ChannelError> {
        let timeout = self.config.notify_timeout;
        match tokio::time::timeout(timeout, notifier.notify(&reminder.owner_id, text)).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout {
                owner: reminder.owner_id.clone(),
                timeout,
            }),
        }
    }
}

/// Spawn the dispatch ticker. The first scan runs immediately so reminders that
/// fell due while the process was down go out at startup.
pub fn spawn_dispatch_ticker(scheduler: Arc<DispatchScheduler>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(scheduler.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            scheduler.tick().await;
        }
    })
}
