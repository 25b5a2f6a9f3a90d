//! In-memory `TicketApi` double for controller unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use jiff::Timestamp;

use crate::error::{DeskError, Result};
use crate::remote::TicketApi;
use crate::types::{
    Comment, CommentCreate, Priority, Status, Ticket, TicketCreate, TicketListResponse,
    TicketQuery, TicketUpdate,
};

#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Transport,
    Rejected(&'static str),
}

impl Failure {
    fn to_error(&self) -> DeskError {
        match self {
            Failure::Transport => DeskError::Transport {
                status: Some(500),
                message: "server responded with 500: Internal Server Error".to_string(),
                server_message: None,
            },
            Failure::Rejected(message) => DeskError::Rejected {
                status: 400,
                server_message: Some(message.to_string()),
            },
        }
    }
}

#[derive(Default)]
struct StubState {
    tickets: Vec<Ticket>,
    comments: Vec<Comment>,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, Failure>,
    clock: i64,
    next_id: u32,
}

impl StubState {
    fn tick(&mut self) -> Timestamp {
        self.clock += 1;
        Timestamp::from_second(1_700_000_000 + self.clock).unwrap()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn record(&mut self, op: &'static str) -> Result<()> {
        self.calls.push(op);
        match self.failures.get(op) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn not_found(id: &str) -> DeskError {
        DeskError::NotFound {
            resource: format!("ticket '{id}'"),
            server_message: Some("Ticket not found".to_string()),
        }
    }
}

#[derive(Default)]
pub(crate) struct StubApi {
    state: Mutex<StubState>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, title: &str, status: Status) -> Ticket {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let ticket = Ticket {
            id: state.next_id("t"),
            title: title.to_string(),
            description: format!("{title} needs attention"),
            priority: Priority::Medium,
            status,
            reporter: "Alice".to_string(),
            created_at: now,
            updated_at: now,
        };
        state.tickets.push(ticket.clone());
        ticket
    }

    pub fn seed_comment(&self, ticket_id: &str, author: &str, body: &str) -> Comment {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let comment = Comment {
            id: state.next_id("c"),
            author: author.to_string(),
            body: body.to_string(),
            ticket_id: ticket_id.to_string(),
            created_at: now,
        };
        state.comments.push(comment.clone());
        comment
    }

    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.state.lock().unwrap().failures.insert(op, failure);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.lock().unwrap().failures.remove(op);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| **c == op).count()
    }
}

impl TicketApi for StubApi {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<TicketListResponse> {
        let mut state = self.state.lock().unwrap();
        state.record("list_tickets")?;
        let items: Vec<Ticket> = state
            .tickets
            .iter()
            .filter(|t| query.status.is_none_or(|s| t.status == s))
            .filter(|t| {
                query.text.as_deref().is_none_or(|text| {
                    let needle = text.to_lowercase();
                    t.title.to_lowercase().contains(&needle)
                        || t.description.to_lowercase().contains(&needle)
                })
            })
            .cloned()
            .collect();
        let total = items.len();
        Ok(TicketListResponse { items, total })
    }

    async fn get_ticket(&self, id: &str) -> Result<Ticket> {
        let mut state = self.state.lock().unwrap();
        state.record("get_ticket")?;
        state
            .tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StubState::not_found(id))
    }

    async fn create_ticket(&self, payload: &TicketCreate) -> Result<Ticket> {
        let mut state = self.state.lock().unwrap();
        state.record("create_ticket")?;
        let now = state.tick();
        let ticket = Ticket {
            id: state.next_id("t"),
            title: payload.title.clone(),
            description: payload.description.clone(),
            priority: payload.priority,
            status: Status::Open,
            reporter: payload.reporter.clone(),
            created_at: now,
            updated_at: now,
        };
        state.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(&self, id: &str, payload: &TicketUpdate) -> Result<Ticket> {
        let mut state = self.state.lock().unwrap();
        state.record("update_ticket")?;
        let now = state.tick();
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StubState::not_found(id))?;
        if let Some(status) = payload.status {
            ticket.status = status;
        }
        if let Some(title) = &payload.title {
            ticket.title = title.clone();
        }
        ticket.updated_at = now;
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("delete_ticket")?;
        let before = state.tickets.len();
        state.tickets.retain(|t| t.id != id);
        if state.tickets.len() == before {
            return Err(StubState::not_found(id));
        }
        Ok(())
    }

    async fn list_comments(&self, ticket_id: &str) -> Result<Vec<Comment>> {
        let mut state = self.state.lock().unwrap();
        state.record("list_comments")?;
        if !state.tickets.iter().any(|t| t.id == ticket_id) {
            return Err(StubState::not_found(ticket_id));
        }
        Ok(state
            .comments
            .iter()
            .filter(|c| c.ticket_id == ticket_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, ticket_id: &str, payload: &CommentCreate) -> Result<Comment> {
        let mut state = self.state.lock().unwrap();
        state.record("create_comment")?;
        if !state.tickets.iter().any(|t| t.id == ticket_id) {
            return Err(StubState::not_found(ticket_id));
        }
        let now = state.tick();
        let comment = Comment {
            id: state.next_id("c"),
            author: payload.author.clone(),
            body: payload.body.clone(),
            ticket_id: ticket_id.to_string(),
            created_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }
}
