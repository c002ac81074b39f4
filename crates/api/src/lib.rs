//! Marketplace API - REST client for the catalog backend.
//!
//! Implements the `marketplace-core` API traits over HTTP.
//!
//! # Usage
//!
//! ```rust,ignore
//! use marketplace_api::MarketplaceClient;
//! use marketplace_core::catalog::{CatalogApiTrait, ProductListRequest};
//!
//! let client = MarketplaceClient::new("http://localhost:8080/api/v1", Duration::from_secs(30))?;
//! let categories = client.list_categories().await?;
//! ```

mod client;
mod error;
mod types;

pub use client::MarketplaceClient;
pub use error::{ApiClientError, Result};
pub use types::{ApiErrorResponse, BrandListResponse, CategoryListResponse, ProductListResponse};
