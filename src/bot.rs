//! Bot main loop: reads the channel's message stream and answers each message
//! before taking the next one.

use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;

use crate::channels::Channel;
use crate::commands::CommandHandler;
use crate::error::Error;

pub struct Bot {
    handler: CommandHandler,
    channel: Arc<dyn Channel>,
}

impl Bot {
    pub fn new(handler: CommandHandler, channel: Arc<dyn Channel>) -> Self {
        Self { handler, channel }
    }

    /// Run until Ctrl+C or until the channel stream ends.
    pub async fn run(self) -> Result<(), Error> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Ctrl+C received, shutting down...");
        })
        .await
    }

    /// Run until `shutdown` resolves or the channel stream ends.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let mut message_stream = self.channel.start().await?;
        tokio::pin!(shutdown);

        tracing::info!(channel = self.channel.name(), "Bot ready and listening");

        loop {
            let message = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("Channel stream ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            let response = self.handler.handle_message(&message).await;
            if let Err(e) = self.channel.respond(&message, response).await {
                tracing::error!(user = %message.user_id, "Failed to send response: {}", e);
            }
        }

        if let Err(e) = self.channel.shutdown().await {
            tracing::warn!("Channel shutdown failed: {}", e);
        }
        Ok(())
    }
}
