use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;

use noticebot::bot::Bot;
use noticebot::channels::{Channel, CliChannel, TelegramChannel};
use noticebot::clock::SystemClock;
use noticebot::commands::CommandHandler;
use noticebot::config::BotConfig;
use noticebot::dispatch::{ChannelNotifier, DispatchScheduler, spawn_dispatch_ticker};
use noticebot::reminders::ReminderStore;
use noticebot::store::JsonFileBackend;

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Log to stderr, or to a daily-rolling file when a log directory is configured.
/// The returned guard must live until exit so buffered lines are flushed.
fn init_tracing(config: &BotConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(log_dir) = &config.log_dir else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "noticebot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env().context("reading configuration")?;
    let _log_guard = init_tracing(&config)?;

    eprintln!("⏰ Noticebot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Data: {}", config.data_path.display());
    eprintln!("   Tick: {:?}", config.dispatch.tick_interval);

    let persistence = Arc::new(JsonFileBackend::new(&config.data_path));
    let store = Arc::new(ReminderStore::open(persistence).await);

    let channel: Arc<dyn Channel> = match config.telegram.clone() {
        Some(telegram) => {
            eprintln!("   Channel: telegram");
            let channel = TelegramChannel::new(telegram.bot_token, telegram.allowed_users);
            channel
                .health_check()
                .await
                .context("connecting to the Telegram Bot API")?;
            Arc::new(channel)
        }
        None => {
            eprintln!("   Channel: cli (set TELEGRAM_BOT_TOKEN to use Telegram)");
            eprintln!("   Type /help and press Enter.\n");
            Arc::new(CliChannel::new())
        }
    };

    let scheduler = Arc::new(DispatchScheduler::new(
        store.clone(),
        Arc::new(SystemClock),
        config.dispatch,
    ));
    scheduler
        .register_notifier(Arc::new(ChannelNotifier::new(channel.clone())))
        .await;
    let ticker = spawn_dispatch_ticker(scheduler);

    let result = Bot::new(CommandHandler::new(store), channel).run().await;

    ticker.abort();
    tracing::info!("Noticebot stopped");
    result.context("bot loop failed")
}
