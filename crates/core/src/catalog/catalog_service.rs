//! Data Fetch Orchestrator for the catalog listing.
//!
//! Maps query states to listing requests and publishes the result for the
//! most recently *initiated* query. Every load takes a generation number
//! when it starts; a load whose generation is no longer the latest when its
//! response arrives is discarded, whatever order the responses come back in.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use super::catalog_model::{FetchResult, FilterOptions, ProductListRequest};
use super::catalog_traits::CatalogApiTrait;
use super::pagination::Pagination;
use super::query_model::QueryState;

/// What the catalog surface renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogView {
    /// Query that produced `result`.
    pub query: QueryState,
    pub result: FetchResult,
    /// True while the latest initiated load has not resolved.
    pub loading: bool,
    /// Generation of the load that produced `result`; 0 before the first.
    pub generation: u64,
}

impl CatalogView {
    pub fn pagination(&self) -> Option<Pagination> {
        Pagination::new(self.result.page, self.result.total, self.result.page_size)
    }
}

pub struct CatalogLoader {
    api: Arc<dyn CatalogApiTrait>,
    page_size: u32,
    generation: AtomicU64,
    active: AtomicBool,
    view: watch::Sender<CatalogView>,
}

impl CatalogLoader {
    pub fn new(api: Arc<dyn CatalogApiTrait>, page_size: u32) -> Self {
        let (view, _) = watch::channel(CatalogView {
            loading: true,
            ..CatalogView::default()
        });
        Self {
            api,
            page_size,
            generation: AtomicU64::new(0),
            active: AtomicBool::new(true),
            view,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn view(&self) -> CatalogView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogView> {
        self.view.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop applying results. Loads still in flight resolve into nothing.
    ///
    /// The flag flips under the view channel lock, so no result is published
    /// after this returns.
    pub fn deactivate(&self) {
        let mut was_active = false;
        self.view.send_if_modified(|_| {
            was_active = self.active.swap(false, Ordering::SeqCst);
            false
        });
        if was_active {
            debug!("Catalog loader deactivated");
        }
    }

    /// Fetch one page for `query`.
    ///
    /// Never fails: any error is logged and replaced by the empty fallback.
    pub async fn fetch(&self, query: &QueryState) -> FetchResult {
        let request = ProductListRequest::from_query(query, self.page_size);
        match self.api.list_products(&request).await {
            Ok(page) => FetchResult::from_page(page, &request),
            Err(e) => {
                warn!(
                    "Product listing failed for ?{}: {}",
                    query.to_query_string(),
                    e
                );
                FetchResult::fallback(request.page, request.page_size)
            }
        }
    }

    /// Fetch `query` and publish the result unless a newer load was started
    /// meanwhile or the loader was deactivated.
    ///
    /// Returns the published result, or `None` when it was discarded.
    pub async fn load(&self, query: QueryState) -> Option<FetchResult> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_if_modified(|view| {
            if !self.is_active() || view.loading {
                return false;
            }
            view.loading = true;
            true
        });

        let result = self.fetch(&query).await;

        // Both checks run under the channel lock so neither a newer load nor
        // `deactivate` can slip in between the check and the write.
        let mut inactive = false;
        let applied = self.view.send_if_modified(|view| {
            if !self.is_active() {
                inactive = true;
                return false;
            }
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *view = CatalogView {
                query: query.clone(),
                result: result.clone(),
                loading: false,
                generation,
            };
            true
        });

        if applied {
            Some(result)
        } else if inactive {
            debug!("Dropping catalog result for generation {}: loader inactive", generation);
            None
        } else {
            debug!(
                "Discarding stale catalog result for generation {} (?{})",
                generation,
                query.to_query_string()
            );
            None
        }
    }

    /// Load the current query now, then again on every change, until the
    /// returned task is aborted or the query store is dropped.
    ///
    /// Loads run concurrently; aborting the task aborts those still in
    /// flight.
    pub fn spawn_watch(self: &Arc<Self>, mut queries: watch::Receiver<QueryState>) -> JoinHandle<()> {
        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let mut in_flight = JoinSet::new();

            let initial = queries.borrow_and_update().clone();
            in_flight.spawn(load_detached(loader.clone(), initial));

            loop {
                tokio::select! {
                    changed = queries.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let query = queries.borrow_and_update().clone();
                        in_flight.spawn(load_detached(loader.clone(), query));
                    }
                    Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                }
            }

            while in_flight.join_next().await.is_some() {}
        })
    }
}

async fn load_detached(loader: Arc<CatalogLoader>, query: QueryState) {
    loader.load(query).await;
}

/// Load the category and brand choices for the filter controls.
///
/// A failed request leaves its list empty rather than failing the sidebar.
pub async fn load_filter_options(api: &dyn CatalogApiTrait) -> FilterOptions {
    let (categories, brands) = futures::join!(api.list_categories(), api.list_brands());

    let categories = categories.unwrap_or_else(|e| {
        warn!("Failed to load categories: {}", e);
        Vec::new()
    });
    let brands = brands.unwrap_or_else(|e| {
        warn!("Failed to load brands: {}", e);
        Vec::new()
    });

    FilterOptions { categories, brands }
}
