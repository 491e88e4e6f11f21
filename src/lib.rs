//! Noticebot: personal reminder bot core.

pub mod bot;
pub mod channels;
pub mod clock;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod reminders;
pub mod store;
