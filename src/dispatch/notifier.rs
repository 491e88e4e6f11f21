//! Notifier: the delivery callback the scheduler hands due reminders to.

use std::sync::Arc;

use async_trait::async_trait;

use crate::channels::{Channel, OutgoingResponse};
use crate::error::ChannelError;

/// Delivers a rendered reminder to its owner.
///
/// `Ok` means the message left the process; any error leaves the reminder
/// unsent so the next tick retries it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, owner_id: &str, text: &str) -> Result<(), ChannelError>;
}

/// Delivers through a chat channel's `send_to`.
pub struct ChannelNotifier {
    channel: Arc<dyn Channel>,
}

impl ChannelNotifier {
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, owner_id: &str, text: &str) -> Result<(), ChannelError> {
        self.channel
            .send_to(owner_id, OutgoingResponse::text(text))
            .await
    }
}
