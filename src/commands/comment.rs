use std::sync::Arc;

use jiff::tz::TimeZone;
use serde_json::json;

use super::{CommandOutput, loaded};
use crate::controller::DetailController;
use crate::display::format_comment;
use crate::error::Result;
use crate::remote::TicketApi;
use crate::validate::CommentDraft;

/// Add a comment to a ticket through the detail screen
pub async fn cmd_comment<A: TicketApi>(
    api: Arc<A>,
    id: &str,
    author: &str,
    body: &str,
    output_json: bool,
) -> Result<()> {
    let mut detail = DetailController::new(api, id);
    detail.load().await;
    loaded(&detail.state().load)?;

    detail.set_comment_draft(CommentDraft::new(author, body));
    let comment = detail.submit_comment().await.into_result()?;

    CommandOutput::new(json!({
        "action": "comment_added",
        "comment": comment,
        "comment_count": detail.comments().len(),
    }))
    .with_text(format_comment(&comment, &TimeZone::system()).trim_end().to_string())
    .print(output_json)
}
