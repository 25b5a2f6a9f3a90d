use jiff::Timestamp;
use jiff::tz::TimeZone;
use owo_colors::{OwoColorize, Stream};

use crate::types::{Priority, Status};

pub mod cli_formatting;

pub use cli_formatting::*;

/// Display format for timestamps, e.g. `Mar 12, 2024, 09:30 AM`
pub const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Status badge, colored when stdout supports it
pub fn format_status_colored(status: Status) -> String {
    let badge = format!("[{}]", status.label());
    match status {
        Status::Open => badge
            .if_supports_color(Stream::Stdout, |s| s.blue())
            .to_string(),
        Status::InProgress => badge
            .if_supports_color(Stream::Stdout, |s| s.magenta())
            .to_string(),
        Status::Closed => badge
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    }
}

pub fn format_priority_colored(priority: Priority) -> String {
    let badge = format!("[{priority}]");
    match priority {
        Priority::High => badge
            .if_supports_color(Stream::Stdout, |s| s.red())
            .to_string(),
        Priority::Medium => badge
            .if_supports_color(Stream::Stdout, |s| s.yellow())
            .to_string(),
        Priority::Low => badge
            .if_supports_color(Stream::Stdout, |s| s.green())
            .to_string(),
    }
}

pub fn format_timestamp_in(ts: Timestamp, tz: &TimeZone) -> String {
    ts.to_zoned(tz.clone()).strftime(TIMESTAMP_FORMAT).to_string()
}
