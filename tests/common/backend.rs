//! In-process fake of the ticket REST service.
//!
//! Serves the `/api/tickets` routes from an in-memory store on a random local
//! port. Each backend runs on its own thread with its own runtime, so it can
//! be used from synchronous CLI tests as well as `#[tokio::test]`s.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;
use serde_json::{Value, json};

use ticketdesk::{Comment, Priority, Status, Ticket};

#[derive(Default)]
struct Store {
    tickets: Vec<Ticket>,
    comments: Vec<Comment>,
    requests: usize,
    next_id: u64,
    last_timestamp: Option<Timestamp>,
    fail_next: Option<(StatusCode, Value)>,
    fail_next_write: Option<(StatusCode, Value)>,
}

impl Store {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", 0x65f0_c100_0000_u64 + self.next_id)
    }

    /// Wall-clock time, nudged forward so successive writes never tie
    fn now(&mut self) -> Timestamp {
        let mut now = Timestamp::now();
        if let Some(last) = self.last_timestamp
            && now <= last
        {
            now = last + SignedDuration::from_millis(1);
        }
        self.last_timestamp = Some(now);
        now
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }
}

type Shared = Arc<Mutex<Store>>;

#[allow(dead_code)]
pub struct FakeBackend {
    addr: SocketAddr,
    store: Shared,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn start() -> Self {
        let store: Shared = Arc::default();
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake backend");
        listener
            .set_nonblocking(true)
            .expect("Failed to configure listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let app = router(Arc::clone(&store));
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build backend runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt listener");
                axum::serve(listener, app).await.expect("Fake backend failed");
            });
        });

        Self { addr, store }
    }

    /// Base URL including the `/api` prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Number of requests received so far
    pub fn requests(&self) -> usize {
        self.lock().requests
    }

    /// Answer the next request with `status` and `{"error": message}`
    pub fn fail_next(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).expect("invalid status code");
        self.lock().fail_next = Some((status, json!({ "error": message })));
    }

    /// Answer the next POST, PATCH or DELETE with `status` and `{"error": message}`
    pub fn fail_next_write(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).expect("invalid status code");
        self.lock().fail_next_write = Some((status, json!({ "error": message })));
    }

    /// Insert a ticket directly, bypassing the API
    pub fn seed(&self, title: &str, description: &str, status: Status) -> Ticket {
        let mut store = self.lock();
        let now = store.now();
        let ticket = Ticket {
            id: store.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            priority: Priority::Medium,
            status,
            reporter: "Alice".to_string(),
            created_at: now,
            updated_at: now,
        };
        store.tickets.push(ticket.clone());
        ticket
    }

    pub fn ticket(&self, id: &str) -> Option<Ticket> {
        self.lock().tickets.iter().find(|t| t.id == id).cloned()
    }

    pub fn ticket_count(&self) -> usize {
        self.lock().tickets.len()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("store poisoned")
    }
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route(
            "/api/tickets/{id}",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
        .route(
            "/api/tickets/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .with_state(store)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Ticket not found")
}

/// Lock the store and count the request, or answer with an injected failure
fn begin(store: &Shared, write: bool) -> Result<MutexGuard<'_, Store>, Response> {
    let mut guard = store.lock().expect("store poisoned");
    guard.requests += 1;
    let injected = match guard.fail_next.take() {
        Some(failure) => Some(failure),
        None if write => guard.fail_next_write.take(),
        None => None,
    };
    match injected {
        Some((status, body)) => Err((status, Json(body)).into_response()),
        None => Ok(guard),
    }
}

fn required_text(body: &Value, field: &str) -> Result<String, Response> {
    match body.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(error(StatusCode::BAD_REQUEST, &format!("{field} is required"))),
    }
}

fn parse_field<T: serde::de::DeserializeOwned>(
    body: &Value,
    field: &str,
) -> Result<Option<T>, Response> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| error(StatusCode::BAD_REQUEST, &format!("Invalid {field}"))),
    }
}

#[derive(Deserialize)]
struct ListParams {
    q: Option<String>,
    status: Option<String>,
}

async fn list_tickets(State(store): State<Shared>, Query(params): Query<ListParams>) -> Response {
    let store = match begin(&store, false) {
        Ok(store) => store,
        Err(response) => return response,
    };

    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(raw) => match serde_json::from_value::<Status>(json!(raw)) {
            Ok(status) => Some(status),
            Err(_) => return error(StatusCode::BAD_REQUEST, "Invalid status"),
        },
    };
    let needle = params.q.map(|q| q.to_lowercase());

    let items: Vec<&Ticket> = store
        .tickets
        .iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| {
            needle.as_deref().is_none_or(|n| {
                t.title.to_lowercase().contains(n) || t.description.to_lowercase().contains(n)
            })
        })
        .collect();

    Json(json!({ "items": items, "total": items.len() })).into_response()
}

async fn get_ticket(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let store = match begin(&store, false) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.tickets.iter().find(|t| t.id == id) {
        Some(ticket) => Json(ticket).into_response(),
        None => not_found(),
    }
}

async fn create_ticket(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = match begin(&store, true) {
        Ok(store) => store,
        Err(response) => return response,
    };

    let fields = (|| {
        Ok::<_, Response>((
            required_text(&body, "title")?,
            required_text(&body, "description")?,
            parse_field::<Priority>(&body, "priority")?.unwrap_or(Priority::Medium),
            required_text(&body, "reporter")?,
        ))
    })();
    let (title, description, priority, reporter) = match fields {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let now = store.now();
    let ticket = Ticket {
        id: store.next_id(),
        title,
        description,
        priority,
        status: Status::Open,
        reporter,
        created_at: now,
        updated_at: now,
    };
    store.tickets.push(ticket.clone());
    (StatusCode::CREATED, Json(ticket)).into_response()
}

async fn update_ticket(
    State(store): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = match begin(&store, true) {
        Ok(store) => store,
        Err(response) => return response,
    };

    let parsed = (|| {
        Ok::<_, Response>((
            parse_field::<String>(&body, "title")?,
            parse_field::<String>(&body, "description")?,
            parse_field::<Priority>(&body, "priority")?,
            parse_field::<Status>(&body, "status")?,
            parse_field::<String>(&body, "reporter")?,
        ))
    })();
    let (title, description, priority, status, reporter) = match parsed {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let now = store.now();
    let Some(ticket) = store.find_mut(&id) else {
        return not_found();
    };
    if let Some(title) = title {
        ticket.title = title;
    }
    if let Some(description) = description {
        ticket.description = description;
    }
    if let Some(priority) = priority {
        ticket.priority = priority;
    }
    if let Some(status) = status {
        ticket.status = status;
    }
    if let Some(reporter) = reporter {
        ticket.reporter = reporter;
    }
    ticket.updated_at = now;
    Json(ticket.clone()).into_response()
}

async fn delete_ticket(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let mut store = match begin(&store, true) {
        Ok(store) => store,
        Err(response) => return response,
    };
    let before = store.tickets.len();
    store.tickets.retain(|t| t.id != id);
    if store.tickets.len() == before {
        return not_found();
    }
    store.comments.retain(|c| c.ticket_id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_comments(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let store = match begin(&store, false) {
        Ok(store) => store,
        Err(response) => return response,
    };
    if !store.tickets.iter().any(|t| t.id == id) {
        return not_found();
    }
    let comments: Vec<&Comment> = store.comments.iter().filter(|c| c.ticket_id == id).collect();
    Json(comments).into_response()
}

async fn create_comment(
    State(store): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = match begin(&store, true) {
        Ok(store) => store,
        Err(response) => return response,
    };
    if !store.tickets.iter().any(|t| t.id == id) {
        return not_found();
    }
    let fields = (|| {
        Ok::<_, Response>((
            required_text(&body, "author")?,
            required_text(&body, "body")?,
        ))
    })();
    let (author, text) = match fields {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let now = store.now();
    let comment = Comment {
        id: store.next_id(),
        author,
        body: text,
        ticket_id: id,
        created_at: now,
    };
    store.comments.push(comment.clone());
    (StatusCode::CREATED, Json(comment)).into_response()
}
