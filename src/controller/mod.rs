//! Per-screen view state controllers.
//!
//! Each controller owns the state of one screen (list, detail, creation form)
//! and is the only thing that mutates it. Remote calls are split in two
//! phases, `begin_*` (synchronous, updates flags and returns a pending
//! request) and `finish_*`/`apply` (folds the response back into state), so a
//! host can render in-flight indicators between them. The `async` convenience
//! methods run both phases back to back.

pub mod detail;
pub mod form;
pub mod list;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use thiserror::Error;

use crate::error::DeskError;
use crate::validate::ValidationErrors;

pub use detail::{DetailController, DetailState, TicketDetail};
pub use form::{FormController, FormState};
pub use list::{ListController, ListData, ListState, TicketFilter};

/// Data lifecycle of a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Error(LoadError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Error shown in place of a screen's data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// User-facing text, e.g. "Failed to load tickets"
    pub message: String,
    /// Rendered cause, for diagnostics
    pub detail: String,
    pub not_found: bool,
}

impl LoadError {
    fn new(message: &str, cause: &DeskError) -> Self {
        Self {
            message: message.to_string(),
            detail: cause.to_string(),
            not_found: cause.is_not_found(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Blocking notice for a failed user action
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Alert {
    pub message: String,
    #[source]
    pub source: Option<DeskError>,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn caused_by(message: impl Into<String>, source: DeskError) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result of a user action on a screen
#[derive(Debug)]
pub enum ActionOutcome<T> {
    Completed(T),
    /// Client-side validation failed; nothing was sent
    Invalid(ValidationErrors),
    Failed(Alert),
}

impl<T> ActionOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            ActionOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Continue with a prepared value, or hand back the outcome to return early
    pub fn proceed<U>(self) -> Result<T, ActionOutcome<U>> {
        match self {
            ActionOutcome::Completed(value) => Ok(value),
            ActionOutcome::Invalid(errors) => Err(ActionOutcome::Invalid(errors)),
            ActionOutcome::Failed(alert) => Err(ActionOutcome::Failed(alert)),
        }
    }

    /// Convert into the crate error taxonomy. A failure keeps the alert text
    /// as the message and the underlying error as its source.
    pub fn into_result(self) -> crate::error::Result<T> {
        match self {
            ActionOutcome::Completed(value) => Ok(value),
            ActionOutcome::Invalid(errors) => Err(DeskError::InvalidInput(errors)),
            ActionOutcome::Failed(alert) => Err(DeskError::Action {
                message: alert.message,
                source: alert.source.map(Box::new),
            }),
        }
    }
}

/// Screens the controllers can send the user to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    TicketList,
    NewTicket,
    TicketDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::TicketList => "/tickets".to_string(),
            Route::NewTicket => "/tickets/new".to_string(),
            Route::TicketDetail(id) => format!("/tickets/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Navigation host, supplied by the presentation layer
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// History stack; the last element is the current screen
impl Navigator for Vec<Route> {
    fn navigate(&mut self, route: Route) {
        self.push(route);
    }
}
