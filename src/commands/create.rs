use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::controller::{FormController, Route};
use crate::error::Result;
use crate::remote::TicketApi;
use crate::validate::TicketDraft;

/// Raw creation form input from the command line
pub struct CreateOptions {
    pub title: String,
    pub description: String,
    /// Unparsed; the form validation reports bad values
    pub priority: String,
    pub reporter: String,
}

/// Create a ticket through the creation form
pub async fn cmd_create<A: TicketApi>(
    api: Arc<A>,
    options: CreateOptions,
    output_json: bool,
) -> Result<()> {
    let mut form = FormController::new(api, Vec::<Route>::new());
    form.set_draft(TicketDraft {
        title: options.title,
        description: options.description,
        priority: options.priority,
        reporter: options.reporter,
    });

    let ticket = form.submit().await.into_result()?;
    let route = form
        .navigator()
        .last()
        .cloned()
        .unwrap_or_else(|| Route::TicketDetail(ticket.id.clone()));

    CommandOutput::new(json!({
        "action": "created",
        "ticket": ticket,
        "path": route.path(),
    }))
    .with_text(format!(
        "Created {} {}",
        ticket.id.cyan(),
        format!("({route})").dimmed()
    ))
    .print(output_json)
}
