use std::sync::Arc;

use serde_json::json;

use super::{CommandOutput, loaded};
use crate::controller::DetailController;
use crate::error::Result;
use crate::remote::TicketApi;
use crate::types::Status;

/// Change a ticket's status through the detail screen
pub async fn cmd_status<A: TicketApi>(
    api: Arc<A>,
    id: &str,
    new_status: Status,
    output_json: bool,
) -> Result<()> {
    let mut detail = DetailController::new(api, id);
    detail.load().await;
    let previous_status = loaded(&detail.state().load)?.ticket.status;

    let ticket = detail.change_status(new_status).await.into_result()?;

    CommandOutput::new(json!({
        "id": ticket.id,
        "action": "status_changed",
        "previous_status": previous_status.to_string(),
        "new_status": ticket.status.to_string(),
    }))
    .with_text(format!("Updated {} -> {}", ticket.id, ticket.status))
    .print(output_json)
}
