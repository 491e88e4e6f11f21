//! User-facing texts. Markdown is Telegram's legacy flavour (`*bold*`).

use crate::channels::{InlineButton, OutgoingResponse};
use crate::error::{EditError, PersistenceError, ValidationError};
use crate::reminders::{DoneReport, Reminder, ReminderLists, format_due};

use super::parser::DONE_CALLBACK_PREFIX;

const BUTTON_LABEL_MAX: usize = 40;

pub const HELP_TEXT: &str = "\
*How to use me*

Add a reminder by sending:
`YYYY-MM-DD HH:MM, text`
`YYYY-MM-DD HH:MM, text, daily|weekly|monthly`

Commands:
/list - show your reminders
/done N [N...] - mark reminders done by number
/edit N YYYY-MM-DD HH:MM, text - change a reminder
/clear - delete completed reminders
/help - this message";

pub fn start() -> OutgoingResponse {
    OutgoingResponse::text(format!(
        "👋 Hi! I'm a reminder bot. Send me a date, time and text and I'll remind you.\n\n{HELP_TEXT}"
    ))
}

pub fn help() -> OutgoingResponse {
    OutgoingResponse::text(HELP_TEXT)
}

fn line(position: usize, reminder: &Reminder) -> String {
    let mut line = format!(
        "{position}. *{}* {}",
        format_due(reminder.due_at),
        reminder.text
    );
    if reminder.recurrence.is_recurring() {
        line.push_str(&format!(" 🔁 {}", reminder.recurrence));
    }
    line
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

/// Both lists, with a "done" button per active reminder.
pub fn lists(lists: &ReminderLists) -> OutgoingResponse {
    if lists.is_empty() {
        return OutgoingResponse::text("You have no reminders.");
    }

    let mut sections = Vec::new();
    if lists.active.is_empty() {
        sections.push("No active reminders.".to_string());
    } else {
        let mut section = String::from("📋 *Active reminders:*");
        for (i, reminder) in lists.active.iter().enumerate() {
            section.push('\n');
            section.push_str(&line(i + 1, reminder));
        }
        sections.push(section);
    }

    if !lists.completed.is_empty() {
        let mut section = String::from("✔️ *Completed:*");
        for (i, reminder) in lists.completed.iter().enumerate() {
            section.push('\n');
            section.push_str(&line(i + 1, reminder));
        }
        section.push_str("\n\nUse /clear to delete completed reminders.");
        sections.push(section);
    }

    let buttons = lists
        .active
        .iter()
        .enumerate()
        .map(|(i, r)| {
            InlineButton::new(
                format!("✅ {}. {}", i + 1, truncate(&r.text, BUTTON_LABEL_MAX)),
                format!("{DONE_CALLBACK_PREFIX}{}", r.id.0),
            )
        })
        .collect();

    OutgoingResponse::text(sections.join("\n\n")).with_buttons(buttons)
}

pub fn added(reminder: &Reminder) -> String {
    let mut text = format!(
        "✅ Reminder saved for *{}*: {}",
        format_due(reminder.due_at),
        reminder.text
    );
    if reminder.recurrence.is_recurring() {
        text.push_str(&format!("\n🔁 Repeats {}", reminder.recurrence));
    }
    text
}

pub fn done_report(report: &DoneReport) -> String {
    let mut lines = Vec::new();
    if report.completed.is_empty() && report.invalid.is_empty() {
        return "Tell me which reminders to complete, e.g. /done 1 3".into();
    }
    if !report.completed.is_empty() {
        lines.push("✅ Done:".to_string());
        lines.extend(report.completed.iter().map(|text| format!("• {text}")));
    }
    for err in &report.invalid {
        lines.push(format!("⚠️ Skipped {}: {err}", err.token()));
    }
    lines.join("\n")
}

pub fn done_by_button(reminder: Option<&Reminder>) -> String {
    match reminder {
        Some(r) => format!("✅ Done: {}", r.text),
        None => "That reminder is already done or no longer exists.".into(),
    }
}

pub fn cleared(count: usize) -> String {
    match count {
        0 => "Nothing to clear.".into(),
        1 => "🧹 Deleted 1 completed reminder.".into(),
        n => format!("🧹 Deleted {n} completed reminders."),
    }
}

pub fn edited(reminder: &Reminder) -> String {
    format!(
        "✏️ Updated: *{}* {}",
        format_due(reminder.due_at),
        reminder.text
    )
}

pub fn validation_error(err: &ValidationError) -> String {
    match err {
        ValidationError::MissingSeparator => {
            "⚠️ I couldn't read that. Use `YYYY-MM-DD HH:MM, text`.\n\nSend /help for all commands."
                .into()
        }
        other => format!("⚠️ {}", capitalize(&other.to_string())),
    }
}

pub fn edit_error(err: &EditError) -> String {
    format!("⚠️ {}", capitalize(&err.to_string()))
}

pub fn unknown_command() -> String {
    "Unknown command. Send /help for the list of commands.".into()
}

/// Appended when a change could not be written to disk.
pub fn persistence_warning(err: &PersistenceError) -> String {
    format!("⚠️ Saved, but writing the reminder file failed ({err}). It may be lost on restart.")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
