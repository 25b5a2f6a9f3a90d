pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod remote;
pub mod types;
pub mod validate;

pub use config::{ApiSettings, BaseUrlSource, Config};
pub use controller::{
    ActionOutcome, Alert, DetailController, FormController, ListController, LoadError, LoadState,
    Navigator, Route, TicketFilter,
};
pub use error::{DeskError, Result};
pub use remote::{HttpTicketClient, TicketApi};
pub use types::{
    Comment, CommentCreate, Priority, Status, Ticket, TicketCreate, TicketListResponse,
    TicketQuery, TicketUpdate,
};
pub use validate::{CommentDraft, TicketDraft, ValidationErrors};
