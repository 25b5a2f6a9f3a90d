use std::sync::Arc;

use serde_json::json;

use super::CommandOutput;
use crate::error::Result;
use crate::remote::TicketApi;

pub async fn cmd_delete<A: TicketApi>(api: Arc<A>, id: &str, output_json: bool) -> Result<()> {
    api.delete_ticket(id).await?;
    tracing::info!(ticket = %id, "deleted ticket");

    CommandOutput::new(json!({
        "id": id,
        "action": "deleted",
    }))
    .with_text(format!("Deleted {id}"))
    .print(output_json)
}
