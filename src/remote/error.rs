//! Mapping of HTTP failures onto the crate error taxonomy.
//!
//! Each operation declares which error classes it can report. A status that
//! maps to an undeclared class is reported as `Transport`:
//!
//! - 404 becomes `NotFound` when the operation addresses an existing ticket
//! - 400 and 422 become `Rejected` when the operation sends a payload
//! - every other non-success status, and any connection failure, becomes `Transport`

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::DeskError;

/// Error classes an operation may report besides `Transport`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKinds {
    pub not_found: bool,
    pub rejected: bool,
}

impl ErrorKinds {
    /// Listing: every failure is a transport failure
    pub const TRANSPORT_ONLY: Self = Self {
        not_found: false,
        rejected: false,
    };
    /// Reads and deletes addressed by ticket id
    pub const NOT_FOUND: Self = Self {
        not_found: true,
        rejected: false,
    };
    /// Creation of a top-level ticket
    pub const REJECTED: Self = Self {
        not_found: false,
        rejected: true,
    };
    /// Writes with a payload to an existing ticket
    pub const ALL: Self = Self {
        not_found: true,
        rejected: true,
    };
}

/// Error body shapes the ticket service is known to send
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Extract the human-readable message from an error body, if there is one
pub fn server_message(body: &str) -> Option<String> {
    let parsed: ServerErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Build the error for a non-success response.
///
/// `resource` names what was being addressed (e.g. `ticket 'abc'`) and is
/// only used for `NotFound`.
pub fn error_for_status(
    status: StatusCode,
    body: &str,
    resource: &str,
    kinds: ErrorKinds,
) -> DeskError {
    let server_message = server_message(body);

    match status {
        StatusCode::NOT_FOUND if kinds.not_found => DeskError::NotFound {
            resource: resource.to_string(),
            server_message,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if kinds.rejected => {
            DeskError::Rejected {
                status: status.as_u16(),
                server_message,
            }
        }
        _ => {
            let detail = server_message
                .clone()
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            DeskError::Transport {
                status: Some(status.as_u16()),
                message: format!("server responded with {}: {}", status.as_u16(), detail),
                server_message,
            }
        }
    }
}
