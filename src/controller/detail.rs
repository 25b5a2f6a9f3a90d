//! Ticket detail screen: one ticket, its comments, status changes and new comments.

use std::sync::Arc;

use crate::error::Result;
use crate::remote::TicketApi;
use crate::types::{Comment, CommentCreate, Status, Ticket, TicketUpdate};
use crate::validate::{CommentDraft, ValidationErrors};

use super::{ActionOutcome, Alert, LoadError, LoadState};

pub const LOAD_TICKET_FAILED: &str = "Failed to load ticket";
pub const UPDATE_STATUS_FAILED: &str = "Failed to update ticket status";
pub const ADD_COMMENT_FAILED: &str = "Failed to add comment";

/// A ticket together with its comments, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
pub struct DetailState {
    pub ticket_id: String,
    pub load: LoadState<TicketDetail>,
    pub updating_status: bool,
    pub submitting_comment: bool,
    pub comment_draft: CommentDraft,
    pub comment_errors: ValidationErrors,
}

/// An issued status update
#[derive(Debug, Clone)]
pub struct StatusChange {
    ticket_id: String,
    update: TicketUpdate,
}

impl StatusChange {
    pub async fn send<A: TicketApi>(self, api: &A) -> Result<Ticket> {
        api.update_ticket(&self.ticket_id, &self.update).await
    }
}

/// An issued, already validated comment
#[derive(Debug, Clone)]
pub struct CommentSubmission {
    ticket_id: String,
    payload: CommentCreate,
}

impl CommentSubmission {
    pub async fn send<A: TicketApi>(self, api: &A) -> Result<Comment> {
        api.create_comment(&self.ticket_id, &self.payload).await
    }
}

pub struct DetailController<A> {
    api: Arc<A>,
    state: DetailState,
}

impl<A: TicketApi> DetailController<A> {
    pub fn new(api: Arc<A>, ticket_id: impl Into<String>) -> Self {
        Self {
            api,
            state: DetailState {
                ticket_id: ticket_id.into(),
                load: LoadState::Loading,
                updating_status: false,
                submitting_comment: false,
                comment_draft: CommentDraft::default(),
                comment_errors: ValidationErrors::new(),
            },
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.state.load.ready().map(|detail| &detail.ticket)
    }

    pub fn comments(&self) -> &[Comment] {
        self.state
            .load
            .ready()
            .map(|detail| detail.comments.as_slice())
            .unwrap_or(&[])
    }

    pub fn comment_draft_mut(&mut self) -> &mut CommentDraft {
        &mut self.state.comment_draft
    }

    pub fn set_comment_draft(&mut self, draft: CommentDraft) {
        self.state.comment_draft = draft;
    }

    /// Fetch the ticket and its comments concurrently. Both must succeed.
    pub async fn load(&mut self) {
        self.state.load = LoadState::Loading;
        let id = self.state.ticket_id.clone();
        tracing::debug!(ticket = %id, "loading ticket detail");

        let api = self.api.as_ref();
        let fetched = futures::try_join!(api.get_ticket(&id), api.list_comments(&id));

        self.state.load = match fetched {
            Ok((ticket, comments)) => LoadState::Ready(TicketDetail { ticket, comments }),
            Err(e) => {
                tracing::warn!(ticket = %id, "failed to load ticket: {e}");
                LoadState::Error(LoadError::new(LOAD_TICKET_FAILED, &e))
            }
        };
    }

    /// Mark the status as updating and build the request. The held ticket is
    /// left untouched until the server answers.
    pub fn begin_status_change(&mut self, status: Status) -> ActionOutcome<StatusChange> {
        let Some(ticket) = self.ticket() else {
            return ActionOutcome::Failed(Alert::new(UPDATE_STATUS_FAILED));
        };
        if self.state.updating_status {
            return ActionOutcome::Failed(Alert::new("A status update is already in progress"));
        }

        let change = StatusChange {
            ticket_id: ticket.id.clone(),
            update: TicketUpdate::status(status),
        };
        self.state.updating_status = true;
        tracing::debug!(ticket = %change.ticket_id, %status, "changing status");
        ActionOutcome::Completed(change)
    }

    pub fn finish_status_change(&mut self, response: Result<Ticket>) -> ActionOutcome<Ticket> {
        self.state.updating_status = false;
        match response {
            Ok(ticket) => {
                if let Some(detail) = self.state.load.ready_mut() {
                    detail.ticket = ticket.clone();
                }
                ActionOutcome::Completed(ticket)
            }
            Err(e) => {
                tracing::warn!(ticket = %self.state.ticket_id, "failed to update status: {e}");
                ActionOutcome::Failed(Alert::caused_by(UPDATE_STATUS_FAILED, e))
            }
        }
    }

    pub async fn change_status(&mut self, status: Status) -> ActionOutcome<Ticket> {
        let change = match self.begin_status_change(status).proceed() {
            Ok(change) => change,
            Err(outcome) => return outcome,
        };
        let response = change.send(self.api.as_ref()).await;
        self.finish_status_change(response)
    }

    /// Validate the comment draft and build the request. Invalid drafts set
    /// field errors and send nothing.
    pub fn begin_comment(&mut self) -> ActionOutcome<CommentSubmission> {
        let Some(ticket) = self.ticket() else {
            return ActionOutcome::Failed(Alert::new(ADD_COMMENT_FAILED));
        };
        if self.state.submitting_comment {
            return ActionOutcome::Failed(Alert::new("A comment is already being submitted"));
        }
        let ticket_id = ticket.id.clone();

        match self.state.comment_draft.validate() {
            Ok(payload) => {
                self.state.comment_errors = ValidationErrors::new();
                self.state.submitting_comment = true;
                ActionOutcome::Completed(CommentSubmission { ticket_id, payload })
            }
            Err(errors) => {
                tracing::debug!(fields = ?errors.fields(), "comment draft rejected");
                self.state.comment_errors = errors.clone();
                ActionOutcome::Invalid(errors)
            }
        }
    }

    /// Append the created comment locally; the list is not re-fetched.
    pub fn finish_comment(&mut self, response: Result<Comment>) -> ActionOutcome<Comment> {
        self.state.submitting_comment = false;
        match response {
            Ok(comment) => {
                if let Some(detail) = self.state.load.ready_mut() {
                    detail.comments.push(comment.clone());
                }
                self.state.comment_draft = CommentDraft::default();
                ActionOutcome::Completed(comment)
            }
            Err(e) => {
                tracing::warn!(ticket = %self.state.ticket_id, "failed to add comment: {e}");
                ActionOutcome::Failed(Alert::caused_by(ADD_COMMENT_FAILED, e))
            }
        }
    }

    pub async fn submit_comment(&mut self) -> ActionOutcome<Comment> {
        let submission = match self.begin_comment().proceed() {
            Ok(submission) => submission,
            Err(outcome) => return outcome,
        };
        let response = submission.send(self.api.as_ref()).await;
        self.finish_comment(response)
    }
}
