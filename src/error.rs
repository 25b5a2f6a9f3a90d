use thiserror::Error;

use crate::validate::ValidationErrors;

#[derive(Error, Debug)]
pub enum DeskError {
    /// Client-side validation failure. Nothing was sent to the server.
    #[error("invalid input: {0}")]
    InvalidInput(ValidationErrors),

    /// The server rejected the payload (400/422).
    #[error("request rejected by server ({status}): {}", server_message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        server_message: Option<String>,
    },

    #[error("{resource} not found")]
    NotFound {
        resource: String,
        server_message: Option<String>,
    },

    #[error("transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
        server_message: Option<String>,
    },

    /// A user action failed. `message` is the alert the screen raised.
    #[error("{message}")]
    Action {
        message: String,
        #[source]
        source: Option<Box<DeskError>>,
    },

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl DeskError {
    /// Message text supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DeskError::Rejected { server_message, .. }
            | DeskError::NotFound { server_message, .. }
            | DeskError::Transport { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DeskError::NotFound { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, DeskError::Transport { .. })
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        DeskError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            server_message: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
