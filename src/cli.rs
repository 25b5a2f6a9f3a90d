use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{ApiSettings, Config};
use crate::error::Result;
use crate::remote::HttpTicketClient;
use crate::types::{Priority, Status, VALID_PRIORITIES, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "ticketdesk")]
#[command(about = "Support ticket tracking client")]
#[command(version)]
pub struct Cli {
    /// API base URL (overrides $TICKETDESK_API_BASE and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tickets
    #[command(visible_alias = "list")]
    Ls {
        /// Search text, matched against title and description
        #[arg(short = 'q', long = "query")]
        query: Option<String>,

        /// Only tickets with this status (OPEN, IN_PROGRESS, CLOSED)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<Status>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a ticket with its comments
    #[command(visible_alias = "s")]
    Show {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new ticket
    #[command(visible_alias = "c")]
    Create {
        /// Ticket title (4-100 characters)
        #[arg(long)]
        title: String,

        /// Description (at least 10 characters)
        #[arg(short, long)]
        description: String,

        /// Reporter name (at least 2 characters)
        #[arg(short, long)]
        reporter: String,

        /// Priority: LOW, MEDIUM, HIGH
        #[arg(short, long, default_value = "MEDIUM")]
        priority: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a ticket's status
    Status {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// New status (OPEN, IN_PROGRESS, CLOSED)
        #[arg(value_parser = parse_status)]
        status: Status,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a comment to a ticket
    Comment {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Comment author (at least 2 characters)
        #[arg(short, long)]
        author: String,

        /// Comment text (2-500 characters)
        #[arg(short, long)]
        body: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update ticket fields; omitted fields are left unchanged
    Edit {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,

        #[arg(short, long)]
        reporter: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a ticket
    Delete {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.base_url, api.connect_timeout_secs)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api.base_url, api.connect_timeout_secs)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Build the HTTP client from the override, environment and config file
fn connect(api_base: Option<&str>) -> Result<Arc<HttpTicketClient>> {
    let config = Config::load()?;
    let settings = ApiSettings::from_env(api_base, &config)?;
    tracing::debug!(
        base_url = %settings.base_url,
        source = %settings.source,
        "resolved API base"
    );
    Ok(Arc::new(HttpTicketClient::new(&settings)?))
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self, api_base: Option<&str>) -> Result<()> {
        use crate::commands::{
            CreateOptions, EditOptions, cmd_comment, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_create, cmd_delete, cmd_edit, cmd_ls, cmd_show, cmd_status,
        };

        match self {
            Commands::Ls {
                query,
                status,
                json,
            } => cmd_ls(connect(api_base)?, query.as_deref(), status, json).await,
            Commands::Show { id, json } => cmd_show(connect(api_base)?, &id, json).await,
            Commands::Create {
                title,
                description,
                reporter,
                priority,
                json,
            } => {
                let options = CreateOptions {
                    title,
                    description,
                    priority,
                    reporter,
                };
                cmd_create(connect(api_base)?, options, json).await
            }
            Commands::Status { id, status, json } => {
                cmd_status(connect(api_base)?, &id, status, json).await
            }
            Commands::Comment {
                id,
                author,
                body,
                json,
            } => cmd_comment(connect(api_base)?, &id, &author, &body, json).await,
            Commands::Edit {
                id,
                title,
                description,
                priority,
                reporter,
                json,
            } => {
                let options = EditOptions {
                    title,
                    description,
                    priority,
                    reporter,
                };
                cmd_edit(connect(api_base)?, &id, options, json).await
            }
            Commands::Delete { id, json } => cmd_delete(connect(api_base)?, &id, json).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(api_base, json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            },
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> std::result::Result<T, String>
where
    F: FnOnce(&str) -> std::result::Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "priority",
        VALID_PRIORITIES,
    )
}

fn parse_status(s: &str) -> std::result::Result<Status, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_ticket_id(s: &str) -> std::result::Result<String, String> {
    if s.trim().is_empty() {
        return Err("ID cannot be empty".to_string());
    }
    Ok(s.to_string())
}
