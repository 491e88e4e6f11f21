//! Reminders: the data model, recurrence arithmetic, and the store that owns them.

pub mod model;
pub mod recurrence;
pub mod store;

pub use model::{
    DoneReport, Persisted, Recurrence, Reminder, ReminderId, ReminderLists, format_due, parse_due,
};
pub use recurrence::next_due;
pub use store::ReminderStore;
