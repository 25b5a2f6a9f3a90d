mod comment;
mod config;
mod create;
mod delete;
mod edit;
mod ls;
mod show;
mod status;

pub use comment::cmd_comment;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use create::{CreateOptions, cmd_create};
pub use delete::cmd_delete;
pub use edit::{EditOptions, cmd_edit};
pub use ls::cmd_ls;
pub use show::cmd_show;
pub use status::cmd_status;

use serde_json::Value;

use crate::controller::LoadState;
use crate::error::{DeskError, Result};

/// Output of a command, printable as JSON or as text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print as pretty JSON when `output_json` is set, otherwise as text
    /// (falling back to JSON when no text was given).
    pub fn print(self, output_json: bool) -> Result<()> {
        match (output_json, self.text) {
            (false, Some(text)) => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Data of a settled screen, or the error it settled with
fn loaded<T>(load: &LoadState<T>) -> Result<&T> {
    match load {
        LoadState::Ready(data) => Ok(data),
        LoadState::Error(err) => Err(DeskError::Other(format!("{}: {}", err.message, err.detail))),
        LoadState::Loading => Err(DeskError::Other("screen is still loading".to_string())),
    }
}
