use std::sync::Arc;

use serde_json::json;

use super::CommandOutput;
use crate::error::{DeskError, Result};
use crate::remote::TicketApi;
use crate::types::{Priority, TicketUpdate};
use crate::validate::validate_ticket_update;

#[derive(Default)]
pub struct EditOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub reporter: Option<String>,
}

/// Apply a partial update. Omitted fields are left unchanged on the server.
pub async fn cmd_edit<A: TicketApi>(
    api: Arc<A>,
    id: &str,
    options: EditOptions,
    output_json: bool,
) -> Result<()> {
    let update = TicketUpdate {
        title: options.title,
        description: options.description,
        priority: options.priority,
        status: None,
        reporter: options.reporter,
    };
    if update.is_empty() {
        return Err(DeskError::Other(
            "nothing to update: pass at least one of --title, --description, --priority, --reporter"
                .to_string(),
        ));
    }
    validate_ticket_update(&update).map_err(DeskError::InvalidInput)?;

    let ticket = api.update_ticket(id, &update).await?;
    tracing::info!(ticket = %ticket.id, "updated ticket");

    let changed: Vec<String> = match serde_json::to_value(&update)? {
        serde_json::Value::Object(fields) => fields.into_iter().map(|(key, _)| key).collect(),
        _ => Vec::new(),
    };

    CommandOutput::new(json!({
        "action": "updated",
        "ticket": ticket,
    }))
    .with_text(format!("Updated {} ({})", ticket.id, changed.join(", ")))
    .print(output_json)
}
