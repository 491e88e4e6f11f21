//! Command handler: the core-facing operations the gateway calls, and the
//! message-level dispatcher that renders their results.

use std::sync::Arc;

use tracing::debug;

use super::parser::{Command, parse_add, parse_edit};
use super::render;
use crate::channels::{IncomingMessage, OutgoingResponse};
use crate::error::{EditError, ValidationError};
use crate::reminders::{
    DoneReport, Persisted, Recurrence, Reminder, ReminderLists, ReminderStore,
};

pub struct CommandHandler {
    store: Arc<ReminderStore>,
}

impl CommandHandler {
    pub fn new(store: Arc<ReminderStore>) -> Self {
        Self { store }
    }

    pub async fn handle_add_command(
        &self,
        owner_id: &str,
        raw_due: &str,
        raw_text: &str,
        raw_recurrence: Option<&str>,
    ) -> Result<Persisted<Reminder>, ValidationError> {
        let recurrence = match raw_recurrence {
            Some(raw) => raw.parse::<Recurrence>()?,
            None => Recurrence::None,
        };
        self.store.add(owner_id, raw_due, raw_text, recurrence).await
    }

    pub async fn handle_list_command(&self, owner_id: &str) -> ReminderLists {
        self.store.lists(owner_id).await
    }

    pub async fn handle_done_command<S: AsRef<str>>(
        &self,
        owner_id: &str,
        tokens: &[S],
    ) -> Persisted<DoneReport> {
        self.store.mark_done(owner_id, tokens).await
    }

    pub async fn handle_clear_command(&self, owner_id: &str) -> Persisted<usize> {
        self.store.clear_completed(owner_id).await
    }

    pub async fn handle_edit_command(
        &self,
        owner_id: &str,
        position: &str,
        raw_due: &str,
        raw_text: &str,
    ) -> Result<Persisted<Reminder>, EditError> {
        self.store.edit(owner_id, position, raw_due, raw_text).await
    }

    /// Parse, run and render one incoming message.
    pub async fn handle_message(&self, msg: &IncomingMessage) -> OutgoingResponse {
        let owner = msg.user_id.as_str();
        let command = Command::from_message(msg);
        debug!(owner = %owner, command = ?command, "Handling command");

        match command {
            Command::Start => render::start(),
            Command::Help => render::help(),
            Command::List => render::lists(&self.handle_list_command(owner).await),
            Command::Done { tokens } => {
                let result = self.handle_done_command(owner, &tokens).await;
                with_warning(render::done_report(&result.value), &result)
            }
            Command::DoneById(id) => match self.store.mark_done_by_id(owner, id).await {
                Some(result) => with_warning(render::done_by_button(Some(&result.value)), &result),
                None => OutgoingResponse::text(render::done_by_button(None)),
            },
            Command::Clear => {
                let result = self.handle_clear_command(owner).await;
                with_warning(render::cleared(result.value), &result)
            }
            Command::Edit { args } => self.edit_message(owner, &args).await,
            Command::Add { raw } => self.add_message(owner, &raw).await,
            Command::Unknown { .. } => OutgoingResponse::text(render::unknown_command()),
        }
    }

    async fn add_message(&self, owner: &str, raw: &str) -> OutgoingResponse {
        let added = match parse_add(raw) {
            Ok(req) => {
                self.handle_add_command(owner, &req.due, &req.text, req.recurrence.as_deref())
                    .await
            }
            Err(e) => Err(e),
        };
        match added {
            Ok(result) => with_warning(render::added(&result.value), &result),
            Err(e) => OutgoingResponse::text(render::validation_error(&e)),
        }
    }

    async fn edit_message(&self, owner: &str, args: &str) -> OutgoingResponse {
        let edited = match parse_edit(args) {
            Ok(req) => {
                self.handle_edit_command(owner, &req.position, &req.due, &req.text)
                    .await
            }
            Err(e) => Err(e),
        };
        let result = match edited {
            Ok(result) => result,
            Err(e) => return OutgoingResponse::text(render::edit_error(&e)),
        };

        let lists = render::lists(&self.handle_list_command(owner).await);
        let content = format!("{}\n\n{}", render::edited(&result.value), lists.content);
        with_warning(content, &result).with_buttons(lists.buttons)
    }
}

fn with_warning<T>(content: String, result: &Persisted<T>) -> OutgoingResponse {
    match &result.warning {
        Some(err) => OutgoingResponse::text(format!(
            "{content}\n\n{}",
            render::persistence_warning(err)
        )),
        None => OutgoingResponse::text(content),
    }
}
