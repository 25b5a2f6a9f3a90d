//! Ticket creation form.

use std::sync::Arc;

use crate::error::{DeskError, Result};
use crate::remote::TicketApi;
use crate::types::{Ticket, TicketCreate};
use crate::validate::{TicketDraft, ValidationErrors};

use super::{ActionOutcome, Alert, Navigator, Route};

pub const CREATE_TICKET_FAILED: &str = "Failed to create ticket";

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub draft: TicketDraft,
    pub submitting: bool,
    /// Last submission error, shown above the form
    pub submit_error: Option<String>,
    pub field_errors: ValidationErrors,
}

pub struct FormController<A, N> {
    api: Arc<A>,
    navigator: N,
    state: FormState,
}

impl<A: TicketApi, N: Navigator> FormController<A, N> {
    pub fn new(api: Arc<A>, navigator: N) -> Self {
        Self {
            api,
            navigator,
            state: FormState::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_navigator(self) -> N {
        self.navigator
    }

    pub fn draft_mut(&mut self) -> &mut TicketDraft {
        &mut self.state.draft
    }

    pub fn set_draft(&mut self, draft: TicketDraft) {
        self.state.draft = draft;
    }

    /// Validate the draft and mark the form as submitting.
    pub fn begin_submit(&mut self) -> ActionOutcome<TicketCreate> {
        if self.state.submitting {
            return ActionOutcome::Failed(Alert::new("Ticket is already being submitted"));
        }
        match self.state.draft.validate() {
            Ok(payload) => {
                self.state.field_errors = ValidationErrors::new();
                self.state.submit_error = None;
                self.state.submitting = true;
                ActionOutcome::Completed(payload)
            }
            Err(errors) => {
                tracing::debug!(fields = ?errors.fields(), "ticket draft rejected");
                self.state.field_errors = errors.clone();
                ActionOutcome::Invalid(errors)
            }
        }
    }

    /// On success navigate to the new ticket. On failure the draft is kept and
    /// the server's message is shown when it sent one.
    pub fn finish_submit(&mut self, response: Result<Ticket>) -> ActionOutcome<Ticket> {
        self.state.submitting = false;
        match response {
            Ok(ticket) => {
                tracing::info!(ticket = %ticket.id, "created ticket");
                self.navigator
                    .navigate(Route::TicketDetail(ticket.id.clone()));
                ActionOutcome::Completed(ticket)
            }
            Err(e) => {
                tracing::warn!("failed to create ticket: {e}");
                let message = submit_error_message(&e);
                self.state.submit_error = Some(message.clone());
                ActionOutcome::Failed(Alert::caused_by(message, e))
            }
        }
    }

    pub async fn submit(&mut self) -> ActionOutcome<Ticket> {
        let payload = match self.begin_submit().proceed() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let response = self.api.create_ticket(&payload).await;
        self.finish_submit(response)
    }

    /// Leave the form for the ticket list
    pub fn cancel(&mut self) {
        self.navigator.navigate(Route::TicketList);
    }
}

fn submit_error_message(error: &DeskError) -> String {
    error
        .server_message()
        .unwrap_or(CREATE_TICKET_FAILED)
        .to_string()
}
