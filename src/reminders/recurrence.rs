//! Recurrence arithmetic.
//!
//! Pure and clock-free. "Monthly" is a fixed 30-day step, not calendar-month
//! arithmetic: a reminder created on the 31st drifts by a day or two each month.

use chrono::{Duration, NaiveDateTime};

use super::model::Recurrence;

impl Recurrence {
    /// Step between occurrences, or `None` for one-shot reminders.
    pub fn step(self) -> Option<Duration> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => Some(Duration::days(1)),
            Recurrence::Weekly => Some(Duration::days(7)),
            Recurrence::Monthly => Some(Duration::days(30)),
        }
    }
}

/// Due time of the occurrence after `due_at`.
///
/// Returns `None` when the reminder does not recur, or when the next time
/// would fall outside the representable date range.
pub fn next_due(due_at: NaiveDateTime, recurrence: Recurrence) -> Option<NaiveDateTime> {
    recurrence
        .step()
        .and_then(|step| due_at.checked_add_signed(step))
}
