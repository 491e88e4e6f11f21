//! Turns raw chat input into [`Command`]s.
//!
//! Slash commands are matched case-insensitively and may carry Telegram's
//! `@BotName` suffix. Anything that is not a slash command is an add request.

use crate::channels::IncomingMessage;
use crate::error::{EditError, ValidationError};
use crate::reminders::{Recurrence, ReminderId};

/// Callback payload prefix of the inline "done" buttons.
pub const DONE_CALLBACK_PREFIX: &str = "done:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    List,
    /// `/done 1 3 x`: raw tokens, resolved by the store.
    Done { tokens: Vec<String> },
    /// A pressed inline button.
    DoneById(ReminderId),
    Clear,
    /// `/edit` with everything after the command word.
    Edit { args: String },
    /// Free text, expected to be `<date time>, <text>[, <recurrence>]`.
    Add { raw: String },
    Unknown { input: String },
}

impl Command {
    pub fn from_message(msg: &IncomingMessage) -> Self {
        match &msg.callback_data {
            Some(data) => Self::parse_callback(data),
            None => Self::parse(&msg.content),
        }
    }

    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        if !trimmed.starts_with('/') {
            return Self::Add {
                raw: trimmed.to_string(),
            };
        }

        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };
        // "/done@NoticeBot" addresses this bot in group chats.
        let word = word.split('@').next().unwrap_or(word).to_lowercase();

        match word.as_str() {
            "/start" => Self::Start,
            "/help" | "/?" => Self::Help,
            "/list" => Self::List,
            "/done" => Self::Done {
                tokens: rest.split_whitespace().map(String::from).collect(),
            },
            "/clear" => Self::Clear,
            "/edit" => Self::Edit {
                args: rest.to_string(),
            },
            _ => Self::Unknown {
                input: trimmed.to_string(),
            },
        }
    }

    pub fn parse_callback(data: &str) -> Self {
        data.strip_prefix(DONE_CALLBACK_PREFIX)
            .and_then(|id| id.parse::<ReminderId>().ok())
            .map(Self::DoneById)
            .unwrap_or_else(|| Self::Unknown {
                input: data.to_string(),
            })
    }
}

/// The pieces of an add message, still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub due: String,
    pub text: String,
    pub recurrence: Option<String>,
}

/// Split `<date time>, <text>[, <recurrence>]`.
///
/// The text may contain commas. A last part is read as the recurrence only when
/// there are at least three parts and it names a known rule.
pub fn parse_add(raw: &str) -> Result<AddRequest, ValidationError> {
    let parts: Vec<&str> = raw.split(',').collect();
    let [due, rest @ ..] = parts.as_slice() else {
        return Err(ValidationError::MissingSeparator);
    };
    if rest.is_empty() {
        return Err(ValidationError::MissingSeparator);
    }

    let (text_parts, recurrence) = match rest.split_last() {
        Some((last, init)) if !init.is_empty() && is_recurrence_keyword(last) => {
            (init, Some(last.trim().to_string()))
        }
        _ => (rest, None),
    };

    Ok(AddRequest {
        due: due.trim().to_string(),
        text: text_parts.join(",").trim().to_string(),
        recurrence,
    })
}

fn is_recurrence_keyword(part: &str) -> bool {
    let part = part.trim();
    !part.is_empty() && part.parse::<Recurrence>().is_ok()
}

/// The pieces of an edit command, still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub position: String,
    pub due: String,
    pub text: String,
}

/// Split `<n> <date time>, <text>`.
pub fn parse_edit(args: &str) -> Result<EditRequest, EditError> {
    let Some((head, text)) = args.split_once(',') else {
        return Err(EditError::BadSyntax {
            reason: "expected /edit N YYYY-MM-DD HH:MM, new text".into(),
        });
    };

    let head = head.trim();
    let Some((position, due)) = head.split_once(char::is_whitespace) else {
        return Err(EditError::BadSyntax {
            reason: "missing reminder number or date".into(),
        });
    };

    Ok(EditRequest {
        position: position.trim().to_string(),
        due: due.trim().to_string(),
        text: text.trim().to_string(),
    })
}
