//! Fixtures and scripted API fakes shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::catalog::{Category, CatalogApiTrait, Product, ProductListRequest, ProductPage};
use crate::errors::{Error, Result};
use crate::exchange::{ExchangeRate, ExchangeRateApiTrait};

pub fn product(id: &str) -> Product {
    let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Product {
        id: id.to_string(),
        external_id: format!("ext-{id}"),
        sku: format!("SKU-{id}"),
        name: format!("Product {id}"),
        original_price: 1000,
        price: 900,
        image_url: String::new(),
        product_url: String::new(),
        brand: "Apple".to_string(),
        category_id: "cat-1".to_string(),
        created_at: created,
        updated_at: created,
    }
}

pub fn category(id: &str, name: &str) -> Category {
    let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Category {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase(),
        url: format!("/catalog/{}/", name.to_lowercase()),
        created_at: created,
        updated_at: created,
    }
}

/// Counts calls and tracks how many are running at once.
#[derive(Default)]
struct CallCounter {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CallCounter {
    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Rate API that replays a script; exhausted scripts fail.
pub struct ScriptedRateApi {
    script: Mutex<VecDeque<std::result::Result<Decimal, &'static str>>>,
    delay: Duration,
    counter: CallCounter,
}

impl ScriptedRateApi {
    pub fn new(script: Vec<std::result::Result<Decimal, &'static str>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            delay: Duration::ZERO,
            counter: CallCounter::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.counter.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.counter.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateApiTrait for ScriptedRateApi {
    async fn get_exchange_rate(&self) -> Result<ExchangeRate> {
        self.counter.enter();
        let next = self.script.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.counter.exit();
        match next {
            Some(Ok(rate)) => Ok(ExchangeRate { rate }),
            Some(Err(message)) => Err(Error::api(500, message)),
            None => Err(Error::Network("script exhausted".into())),
        }
    }
}

/// Catalog API whose listing answers depend on the requested page.
///
/// Each page can be given its own latency and outcome; pages without a
/// script answer immediately with one product named after the page.
#[derive(Default)]
pub struct FakeCatalogApi {
    pages: Mutex<HashMap<u32, (Duration, std::result::Result<ProductPage, u16>)>>,
    products: Mutex<HashMap<String, std::result::Result<Product, u16>>>,
    categories: Mutex<Option<std::result::Result<Vec<Category>, u16>>>,
    brands: Mutex<Option<std::result::Result<Vec<String>, u16>>>,
    requests: Mutex<Vec<ProductListRequest>>,
    counter: CallCounter,
}

impl FakeCatalogApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, page: u32, delay: Duration, total: u64, ids: &[&str]) -> Self {
        let body = ProductPage {
            products: ids.iter().map(|id| product(id)).collect(),
            total,
            page,
            page_size: 24,
        };
        self.pages.lock().unwrap().insert(page, (delay, Ok(body)));
        self
    }

    pub fn failing_page(self, page: u32, delay: Duration, status: u16) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(page, (delay, Err(status)));
        self
    }

    pub fn product(self, product: Product) -> Self {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), Ok(product));
        self
    }

    pub fn failing_product(self, id: &str, status: u16) -> Self {
        self.products
            .lock()
            .unwrap()
            .insert(id.to_string(), Err(status));
        self
    }

    pub fn categories(self, outcome: std::result::Result<Vec<Category>, u16>) -> Self {
        *self.categories.lock().unwrap() = Some(outcome);
        self
    }

    pub fn brands(self, outcome: std::result::Result<Vec<String>, u16>) -> Self {
        *self.brands.lock().unwrap() = Some(outcome);
        self
    }

    pub fn requests(&self) -> Vec<ProductListRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.counter.calls.load(Ordering::SeqCst)
    }
}

fn status_error(status: u16, what: &str) -> Error {
    if status == 404 {
        Error::NotFound(what.to_string())
    } else {
        Error::api(status, format!("API error: {status}"))
    }
}

#[async_trait]
impl CatalogApiTrait for FakeCatalogApi {
    async fn list_products(&self, request: &ProductListRequest) -> Result<ProductPage> {
        self.counter.enter();
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.pages.lock().unwrap().get(&request.page).cloned();
        let (delay, outcome) = scripted.unwrap_or_else(|| {
            (
                Duration::ZERO,
                Ok(ProductPage {
                    products: vec![product(&format!("p{}", request.page))],
                    total: 1,
                    page: request.page,
                    page_size: request.page_size,
                }),
            )
        });
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.counter.exit();
        outcome.map_err(|status| status_error(status, "products"))
    }

    async fn get_product(&self, id: &str) -> Result<Product> {
        self.counter.enter();
        let outcome = self.products.lock().unwrap().get(id).cloned();
        self.counter.exit();
        match outcome {
            Some(Ok(product)) => Ok(product),
            Some(Err(status)) => Err(status_error(status, id)),
            None => Err(status_error(404, id)),
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        match self.categories.lock().unwrap().clone() {
            Some(Ok(categories)) => Ok(categories),
            Some(Err(status)) => Err(status_error(status, "categories")),
            None => Ok(Vec::new()),
        }
    }

    async fn list_brands(&self) -> Result<Vec<String>> {
        match self.brands.lock().unwrap().clone() {
            Some(Ok(brands)) => Ok(brands),
            Some(Err(status)) => Err(status_error(status, "brands")),
            None => Ok(Vec::new()),
        }
    }
}
