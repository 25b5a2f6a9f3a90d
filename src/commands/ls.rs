use std::sync::Arc;

use jiff::tz::TimeZone;
use serde_json::json;

use super::{CommandOutput, loaded};
use crate::controller::{ListController, TicketFilter};
use crate::display::format_ticket_table;
use crate::error::Result;
use crate::remote::TicketApi;
use crate::types::Status;

/// List tickets matching the optional text and status filters
pub async fn cmd_ls<A: TicketApi>(
    api: Arc<A>,
    text: Option<&str>,
    status: Option<Status>,
    output_json: bool,
) -> Result<()> {
    let filter = TicketFilter::new(text.unwrap_or_default(), status);
    let mut list = ListController::new(api, filter);
    list.refresh().await;

    let data = loaded(&list.state().load)?;

    CommandOutput::new(json!({
        "items": data.tickets,
        "total": data.total,
    }))
    .with_text(format_ticket_table(
        &data.tickets,
        data.total,
        &TimeZone::system(),
    ))
    .print(output_json)
}
