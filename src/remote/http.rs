//! REST implementation of [`TicketApi`] over `reqwest`.

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiSettings;
use crate::error::{DeskError, Result};
use crate::types::{
    Comment, CommentCreate, Ticket, TicketCreate, TicketListResponse, TicketQuery, TicketUpdate,
};

use super::TicketApi;
use super::error::{ErrorKinds, error_for_status};

const USER_AGENT: &str = concat!("ticketdesk/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the ticket service
#[derive(Debug, Clone)]
pub struct HttpTicketClient {
    client: Client,
    base_url: Url,
}

impl HttpTicketClient {
    /// Create a client from resolved settings.
    ///
    /// Only the connect phase is bounded; in-flight requests are never cancelled.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DeskError::Config(format!(
                    "API base URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
    }

    /// Send a request and return the successful response.
    async fn execute(
        &self,
        request: RequestBuilder,
        resource: &str,
        kinds: ErrorKinds,
    ) -> Result<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "sending request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %path, "request failed: {e}");
            DeskError::Transport {
                status: None,
                message: format!("failed to reach ticket service: {e}"),
                server_message: None,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        let error = error_for_status(status, &body, resource, kinds);
        tracing::warn!(%method, %path, status = status.as_u16(), "request failed: {error}");
        Err(error)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
        kinds: ErrorKinds,
    ) -> Result<T> {
        let response = self.execute(request, resource, kinds).await?;
        response.json::<T>().await.map_err(|e| DeskError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: format!("failed to parse response for {resource}: {e}"),
            server_message: None,
        })
    }
}

fn ticket_resource(id: &str) -> String {
    format!("ticket '{id}'")
}

impl TicketApi for HttpTicketClient {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<TicketListResponse> {
        let url = self.endpoint(&["tickets"])?;
        let request = self.request(Method::GET, url).query(&query.to_params());
        self.execute_json(request, "tickets", ErrorKinds::TRANSPORT_ONLY)
            .await
    }

    async fn get_ticket(&self, id: &str) -> Result<Ticket> {
        let url = self.endpoint(&["tickets", id])?;
        let request = self.request(Method::GET, url);
        self.execute_json(request, &ticket_resource(id), ErrorKinds::NOT_FOUND)
            .await
    }

    async fn create_ticket(&self, payload: &TicketCreate) -> Result<Ticket> {
        let url = self.endpoint(&["tickets"])?;
        let request = self.request(Method::POST, url).json(payload);
        self.execute_json(request, "tickets", ErrorKinds::REJECTED)
            .await
    }

    async fn update_ticket(&self, id: &str, payload: &TicketUpdate) -> Result<Ticket> {
        let url = self.endpoint(&["tickets", id])?;
        let request = self.request(Method::PATCH, url).json(payload);
        self.execute_json(request, &ticket_resource(id), ErrorKinds::ALL)
            .await
    }

    async fn delete_ticket(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["tickets", id])?;
        let request = self.request(Method::DELETE, url);
        self.execute(request, &ticket_resource(id), ErrorKinds::NOT_FOUND)
            .await?;
        Ok(())
    }

    async fn list_comments(&self, ticket_id: &str) -> Result<Vec<Comment>> {
        let url = self.endpoint(&["tickets", ticket_id, "comments"])?;
        let request = self.request(Method::GET, url);
        self.execute_json(request, &ticket_resource(ticket_id), ErrorKinds::NOT_FOUND)
            .await
    }

    async fn create_comment(&self, ticket_id: &str, payload: &CommentCreate) -> Result<Comment> {
        let url = self.endpoint(&["tickets", ticket_id, "comments"])?;
        let request = self.request(Method::POST, url).json(payload);
        self.execute_json(request, &ticket_resource(ticket_id), ErrorKinds::ALL)
            .await
    }
}
