//! Wire shapes of the catalog API.
//!
//! The backend may send `null` for any list; these types accept that and
//! the client normalizes it to an empty list before anything reaches core.

use marketplace_core::catalog::{Category, Product, ProductPage};
use serde::Deserialize;

/// `GET /products` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub products: Option<Vec<Product>>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl From<ProductListResponse> for ProductPage {
    fn from(response: ProductListResponse) -> Self {
        ProductPage {
            products: response.products.unwrap_or_default(),
            total: response.total,
            page: response.page,
            page_size: response.page_size,
        }
    }
}

/// `GET /categories` response.
pub type CategoryListResponse = Option<Vec<Category>>;

/// `GET /brands` response.
pub type BrandListResponse = Option<Vec<String>>;

/// Body of a non-success response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}
