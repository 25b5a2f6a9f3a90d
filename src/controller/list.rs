//! Ticket list screen.
//!
//! The active filter pair (text, status) comes from the screen's navigation
//! query parameters. Every filter change issues a new fetch; each fetch
//! carries a generation number and only the response for the latest
//! generation is applied, so a slow stale response can never overwrite
//! fresher results.

use std::sync::Arc;

use crate::error::Result;
use crate::remote::TicketApi;
use crate::types::{Status, Ticket, TicketListResponse, TicketQuery};

use super::{LoadError, LoadState};

pub const LOAD_TICKETS_FAILED: &str = "Failed to load tickets";

/// Committed list filters as held in the navigation query (`q`, `status`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub text: String,
    pub status: Option<Status>,
}

impl TicketFilter {
    pub fn new(text: impl Into<String>, status: Option<Status>) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }

    /// Read filters from query parameters. Unknown keys are ignored, and so is
    /// a status value that is not one of the known statuses.
    pub fn from_query_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut filter = TicketFilter::default();
        for (key, value) in params {
            match key {
                "q" => filter.text = value.to_string(),
                "status" if !value.is_empty() => match value.parse() {
                    Ok(status) => filter.status = Some(status),
                    Err(_) => tracing::warn!("ignoring unknown status filter '{value}'"),
                },
                _ => {}
            }
        }
        filter
    }

    /// Query parameters to navigate to; empty filters are dropped
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        self.to_query().to_params()
    }

    pub fn to_query(&self) -> TicketQuery {
        TicketQuery::new(Some(&self.text), self.status)
    }
}

/// Loaded list data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListData {
    pub tickets: Vec<Ticket>,
    /// Server-reported total, independent of `tickets.len()`
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub filter: TicketFilter,
    pub load: LoadState<ListData>,
}

/// A fetch that has been issued but not yet applied
#[derive(Debug, Clone)]
pub struct ListRequest {
    generation: u64,
    query: TicketQuery,
}

impl ListRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &TicketQuery {
        &self.query
    }

    pub async fn send<A: TicketApi>(self, api: &A) -> ListResponse {
        let result = api.list_tickets(&self.query).await;
        ListResponse {
            generation: self.generation,
            result,
        }
    }
}

/// Response to a [`ListRequest`], tagged with its generation
#[derive(Debug)]
pub struct ListResponse {
    generation: u64,
    result: Result<TicketListResponse>,
}

impl ListResponse {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct ListController<A> {
    api: Arc<A>,
    state: ListState,
    latest: u64,
}

impl<A: TicketApi> ListController<A> {
    /// Controller for a screen mounted with `filter`; call [`Self::refresh`] to load
    pub fn new(api: Arc<A>, filter: TicketFilter) -> Self {
        Self {
            api,
            state: ListState {
                filter,
                load: LoadState::Loading,
            },
            latest: 0,
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn filter(&self) -> &TicketFilter {
        &self.state.filter
    }

    pub fn tickets(&self) -> &[Ticket] {
        self.state
            .load
            .ready()
            .map(|data| data.tickets.as_slice())
            .unwrap_or(&[])
    }

    /// Commit `filter` and issue a new generation. The screen enters Loading.
    pub fn begin_fetch(&mut self, filter: TicketFilter) -> ListRequest {
        self.latest += 1;
        self.state.filter = filter;
        self.state.load = LoadState::Loading;
        tracing::debug!(generation = self.latest, ?self.state.filter, "fetching tickets");
        ListRequest {
            generation: self.latest,
            query: self.state.filter.to_query(),
        }
    }

    /// Apply a response. Returns `false` when the response is stale and was dropped.
    pub fn apply(&mut self, response: ListResponse) -> bool {
        if response.generation != self.latest {
            tracing::debug!(
                generation = response.generation,
                latest = self.latest,
                "discarding stale ticket list"
            );
            return false;
        }

        self.state.load = match response.result {
            Ok(list) => LoadState::Ready(ListData {
                tickets: list.items,
                total: list.total,
            }),
            Err(e) => {
                tracing::warn!("failed to load tickets: {e}");
                LoadState::Error(LoadError::new(LOAD_TICKETS_FAILED, &e))
            }
        };
        true
    }

    /// Fetch with the current filter (mount or explicit reload)
    pub async fn refresh(&mut self) {
        let request = self.begin_fetch(self.state.filter.clone());
        let response = request.send(self.api.as_ref()).await;
        self.apply(response);
    }

    /// React to a navigation filter change. An unchanged filter on a screen
    /// that already has a result does nothing.
    pub async fn set_filter(&mut self, filter: TicketFilter) {
        if filter == self.state.filter && self.latest > 0 && !self.state.load.is_loading() {
            return;
        }
        let request = self.begin_fetch(filter);
        let response = request.send(self.api.as_ref()).await;
        self.apply(response);
    }
}
