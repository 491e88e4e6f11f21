//! Reminder delivery: the Notifier seam and the periodic dispatch scheduler.

pub mod notifier;
pub mod scheduler;

pub use notifier::{ChannelNotifier, Notifier};
pub use scheduler::{
    DispatchConfig, DispatchScheduler, TickReport, render_notification, spawn_dispatch_ticker,
};
