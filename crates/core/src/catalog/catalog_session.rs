//! A mounted catalog surface.
//!
//! Owns the query store, one debounce gate per volatile input, the loader
//! driven by store changes and the exchange rate poller. Tearing the session
//! down cancels pending edits, stops applying fetch results and stops the
//! poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::catalog_service::{CatalogLoader, CatalogView};
use super::catalog_traits::CatalogApiTrait;
use super::pagination::Pagination;
use super::query_model::{parse_price_input, QueryState};
use super::query_store::QueryStore;
use crate::constants::{DEFAULT_PAGE_SIZE, EXCHANGE_POLL_INTERVAL, PRICE_DEBOUNCE, SEARCH_DEBOUNCE};
use crate::exchange::{ExchangeRateApiTrait, ExchangeRatePoller, PollState};
use crate::utils::Debouncer;

/// Timing and sizing of a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub page_size: u32,
    pub search_delay: Duration,
    pub price_delay: Duration,
    pub poll_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_delay: SEARCH_DEBOUNCE,
            price_delay: PRICE_DEBOUNCE,
            poll_interval: EXCHANGE_POLL_INTERVAL,
        }
    }
}

pub struct CatalogSession {
    store: QueryStore,
    loader: Arc<CatalogLoader>,
    watch: Mutex<Option<JoinHandle<()>>>,
    search_gate: Debouncer<String>,
    min_price_gate: Debouncer<Option<u64>>,
    max_price_gate: Debouncer<Option<u64>>,
    poller: ExchangeRatePoller,
    options: SessionOptions,
    mounted: AtomicBool,
}

impl CatalogSession {
    /// Mount a catalog surface on `store`. Starts the initial load and the
    /// exchange rate poll. Must be called within a Tokio runtime.
    pub fn mount(
        store: QueryStore,
        catalog: Arc<dyn CatalogApiTrait>,
        rates: Arc<dyn ExchangeRateApiTrait>,
        options: SessionOptions,
    ) -> Self {
        let loader = Arc::new(CatalogLoader::new(catalog, options.page_size));
        let watch = loader.spawn_watch(store.subscribe());
        let poller = ExchangeRatePoller::start(rates, options.poll_interval);

        info!(
            "Catalog session mounted at ?{} (page size {})",
            store.url_query(),
            options.page_size
        );

        Self {
            store,
            loader,
            watch: Mutex::new(Some(watch)),
            search_gate: Debouncer::new("search"),
            min_price_gate: Debouncer::new("min_price"),
            max_price_gate: Debouncer::new("max_price"),
            poller,
            options,
            mounted: AtomicBool::new(true),
        }
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    pub fn query(&self) -> QueryState {
        self.store.current()
    }

    pub fn url_query(&self) -> String {
        self.store.url_query()
    }

    pub fn page_size(&self) -> u32 {
        self.options.page_size
    }

    pub fn view(&self) -> CatalogView {
        self.loader.view()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<CatalogView> {
        self.loader.subscribe()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.loader.view().pagination()
    }

    pub fn exchange(&self) -> PollState {
        self.poller.current()
    }

    pub fn subscribe_exchange(&self) -> watch::Receiver<PollState> {
        self.poller.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Search box edit; applied after the search quiet period.
    pub fn edit_search(&self, raw: &str) {
        let store = self.store.clone();
        self.search_gate
            .schedule(raw.to_string(), self.options.search_delay, move |value| {
                store.set_search(value);
            });
    }

    /// Minimum price box edit; unparseable text clears the bound.
    pub fn edit_min_price(&self, raw: &str) {
        let store = self.store.clone();
        self.min_price_gate
            .schedule(parse_price_input(raw), self.options.price_delay, move |value| {
                store.set_min_price(value);
            });
    }

    /// Maximum price box edit; unparseable text clears the bound.
    pub fn edit_max_price(&self, raw: &str) {
        let store = self.store.clone();
        self.max_price_gate
            .schedule(parse_price_input(raw), self.options.price_delay, move |value| {
                store.set_max_price(value);
            });
    }

    pub fn set_category(&self, category_id: &str) -> bool {
        self.store.set_category(category_id)
    }

    pub fn set_brand(&self, brand: &str) -> bool {
        self.store.set_brand(brand)
    }

    pub fn set_sort(&self, sort_fields: &str) -> bool {
        self.store.set_sort(sort_fields)
    }

    pub fn set_page(&self, page: u32) -> bool {
        self.store.set_page(page)
    }

    /// Go to the next page of the displayed result, if there is one.
    pub fn next_page(&self) -> bool {
        match self.pagination().and_then(|p| p.next()) {
            Some(page) => self.store.set_page(page),
            None => false,
        }
    }

    /// Go to the previous page of the displayed result, if there is one.
    pub fn previous_page(&self) -> bool {
        match self.pagination().and_then(|p| p.previous()) {
            Some(page) => self.store.set_page(page),
            None => false,
        }
    }

    /// Clear all filters. Edits still waiting in a gate are dropped so they
    /// cannot re-apply a filter after the reset.
    pub fn reset(&self) -> bool {
        self.cancel_pending_edits();
        self.store.reset()
    }

    /// Unmount: drop pending edits, stop applying fetch results, stop the
    /// exchange rate poll. Idempotent.
    pub fn teardown(&self) {
        if !self.mounted.swap(false, Ordering::SeqCst) {
            return;
        }

        self.cancel_pending_edits();
        self.loader.deactivate();
        let watch = self
            .watch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(watch) = watch {
            watch.abort();
        }
        self.poller.stop();

        debug!("Catalog session torn down at ?{}", self.store.url_query());
    }

    fn cancel_pending_edits(&self) {
        self.search_gate.cancel();
        self.min_price_gate.cancel();
        self.max_price_gate.cancel();
    }
}

impl Drop for CatalogSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
