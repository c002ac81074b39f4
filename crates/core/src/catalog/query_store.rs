//! Query State Store.
//!
//! Owns the canonical [`QueryState`] for one catalog surface and publishes
//! every change on a `watch` channel. Each setter is a single `send_if_modified`
//! call, so the field update and the page reset land together and a
//! subscriber can never observe one without the other.

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

use super::query_model::{QueryChange, QueryState};
use crate::errors::Result;

/// Shared handle to the query state. Clones write to the same state.
#[derive(Clone)]
pub struct QueryStore {
    state: Arc<watch::Sender<QueryState>>,
}

impl QueryStore {
    pub fn new(initial: QueryState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    /// Initialize from a URL query string, as on page load.
    pub fn from_url(query: &str) -> Result<Self> {
        Ok(Self::new(QueryState::from_query_string(query)?))
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every effective change.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// The URL query string for the current state.
    pub fn url_query(&self) -> String {
        self.state.borrow().to_query_string()
    }

    /// Apply one edit atomically. Returns whether the state changed;
    /// subscribers are only notified when it did.
    pub fn apply(&self, change: QueryChange) -> bool {
        let label = format!("{:?}", change);
        let changed = self.state.send_if_modified(|state| state.apply(change));
        if changed {
            debug!("Query changed by {}: ?{}", label, self.url_query());
        }
        changed
    }

    /// Replace the whole state from a URL, as on back/forward navigation.
    pub fn replace_from_url(&self, query: &str) -> Result<bool> {
        let parsed = QueryState::from_query_string(query)?;
        Ok(self.state.send_if_modified(|state| {
            if *state == parsed {
                return false;
            }
            *state = parsed;
            true
        }))
    }

    pub fn set_search(&self, value: impl Into<String>) -> bool {
        self.apply(QueryChange::Search(value.into()))
    }

    pub fn set_category(&self, value: impl Into<String>) -> bool {
        self.apply(QueryChange::Category(value.into()))
    }

    pub fn set_brand(&self, value: impl Into<String>) -> bool {
        self.apply(QueryChange::Brand(value.into()))
    }

    pub fn set_min_price(&self, value: Option<u64>) -> bool {
        self.apply(QueryChange::MinPrice(value))
    }

    pub fn set_max_price(&self, value: Option<u64>) -> bool {
        self.apply(QueryChange::MaxPrice(value))
    }

    pub fn set_sort(&self, value: impl Into<String>) -> bool {
        self.apply(QueryChange::Sort(value.into()))
    }

    pub fn set_page(&self, page: u32) -> bool {
        self.apply(QueryChange::Page(page))
    }

    /// Clear all filters and go back to page 1.
    pub fn reset(&self) -> bool {
        self.apply(QueryChange::Reset)
    }
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new(QueryState::default())
    }
}
