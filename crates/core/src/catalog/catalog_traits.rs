//! Traits for the catalog REST collaborator.

use async_trait::async_trait;

use super::catalog_model::{Category, Product, ProductListRequest, ProductPage};
use crate::errors::Result;

/// Read access to the product catalog API.
///
/// Implementations must never surface a `null` list: absent lists come back
/// empty.
#[async_trait]
pub trait CatalogApiTrait: Send + Sync {
    /// `GET /products`
    async fn list_products(&self, request: &ProductListRequest) -> Result<ProductPage>;

    /// `GET /products/{id}`. A missing product is reported as an error for
    /// which [`crate::Error::is_not_found`] holds.
    async fn get_product(&self, id: &str) -> Result<Product>;

    /// `GET /categories`
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// `GET /brands`
    async fn list_brands(&self) -> Result<Vec<String>>;
}
