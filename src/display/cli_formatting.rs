use jiff::tz::TimeZone;
use owo_colors::{OwoColorize, Stream};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::controller::TicketDetail;
use crate::types::{Comment, Ticket};
use crate::validate::ValidationErrors;

use super::{format_priority_colored, format_status_colored, format_timestamp_in};

/// A row in the ticket list table
#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reporter")]
    reporter: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Render the ticket list as a table followed by a count line.
///
/// `total` is the server-reported total and may differ from `tickets.len()`.
pub fn format_ticket_table(tickets: &[Ticket], total: usize, tz: &TimeZone) -> String {
    if tickets.is_empty() {
        return "No tickets found".to_string();
    }

    let rows: Vec<TicketRow> = tickets
        .iter()
        .map(|t| TicketRow {
            id: t.id.clone(),
            title: t.title.clone(),
            priority: t.priority.to_string(),
            status: t.status.label(),
            reporter: t.reporter.clone(),
            updated: format_timestamp_in(t.updated_at, tz),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let noun = if total == 1 { "ticket" } else { "tickets" };
    format!("{table}\n{total} {noun}")
}

/// Render a ticket header, description and comments
pub fn format_ticket_detail(detail: &TicketDetail, tz: &TimeZone) -> String {
    let ticket = &detail.ticket;
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} {}\n",
        ticket.title.if_supports_color(Stream::Stdout, |s| s.bold()),
        format_priority_colored(ticket.priority),
        format_status_colored(ticket.status),
    ));
    output.push_str(&format!(
        "{}\n",
        format!(
            "{} | Reported by {} | Created {} | Updated {}",
            ticket.id,
            ticket.reporter,
            format_timestamp_in(ticket.created_at, tz),
            format_timestamp_in(ticket.updated_at, tz),
        )
        .if_supports_color(Stream::Stdout, |s| s.dimmed())
    ));
    output.push('\n');
    output.push_str(&ticket.description);
    output.push_str("\n\n");

    output.push_str(&format!("## Comments ({})\n", detail.comments.len()));
    if detail.comments.is_empty() {
        output.push_str("\nNo comments yet.");
    }
    for comment in &detail.comments {
        output.push('\n');
        output.push_str(&format_comment(comment, tz));
    }
    output
}

pub fn format_comment(comment: &Comment, tz: &TimeZone) -> String {
    format!(
        "{} {}\n{}\n",
        comment
            .author
            .if_supports_color(Stream::Stdout, |s| s.cyan()),
        format_timestamp_in(comment.created_at, tz).if_supports_color(Stream::Stdout, |s| s.dimmed()),
        comment.body,
    )
}

/// One `field: message` line per offending field
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}
