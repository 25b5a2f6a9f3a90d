//! Remote access to the ticket REST service.
//!
//! [`TicketApi`] is the seam the view controllers are written against;
//! [`HttpTicketClient`] is the production implementation. Nothing in this
//! layer caches or retries: retry policy belongs to the caller.

pub mod error;
pub mod http;

use std::future::Future;

use crate::error::Result;
use crate::types::{
    Comment, CommentCreate, Ticket, TicketCreate, TicketListResponse, TicketQuery, TicketUpdate,
};

pub use http::HttpTicketClient;

/// Typed operations against the ticket resource and its comment sub-resource
pub trait TicketApi: Send + Sync {
    /// List tickets matching every filter present in `query`
    fn list_tickets(
        &self,
        query: &TicketQuery,
    ) -> impl Future<Output = Result<TicketListResponse>> + Send;

    /// Fetch one ticket; `NotFound` when the id is unknown
    fn get_ticket(&self, id: &str) -> impl Future<Output = Result<Ticket>> + Send;

    /// Create a ticket; the server assigns id, status and timestamps
    fn create_ticket(&self, payload: &TicketCreate) -> impl Future<Output = Result<Ticket>> + Send;

    /// Apply a partial update and return the updated ticket
    fn update_ticket(
        &self,
        id: &str,
        payload: &TicketUpdate,
    ) -> impl Future<Output = Result<Ticket>> + Send;

    fn delete_ticket(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Comments of a ticket, in server order
    fn list_comments(&self, ticket_id: &str) -> impl Future<Output = Result<Vec<Comment>>> + Send;

    fn create_comment(
        &self,
        ticket_id: &str,
        payload: &CommentCreate,
    ) -> impl Future<Output = Result<Comment>> + Send;
}
