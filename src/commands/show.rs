use std::sync::Arc;

use jiff::tz::TimeZone;
use serde_json::json;

use super::{CommandOutput, loaded};
use crate::controller::DetailController;
use crate::display::format_ticket_detail;
use crate::error::Result;
use crate::remote::TicketApi;

/// Display a ticket with its comments
pub async fn cmd_show<A: TicketApi>(api: Arc<A>, id: &str, output_json: bool) -> Result<()> {
    let mut detail = DetailController::new(api, id);
    detail.load().await;

    let data = loaded(&detail.state().load)?;

    CommandOutput::new(json!({
        "ticket": data.ticket,
        "comments": data.comments,
    }))
    .with_text(format_ticket_detail(data, &TimeZone::system()))
    .print(output_json)
}
