//! REST client for the catalog backend.
//!
//! Every endpoint is resolved against a fixed base path, e.g.
//! `http://localhost:8080/api/v1`. A non-success status becomes
//! [`ApiClientError::Api`] carrying the body's `error` field, or
//! `API error: <status>` when the body has none.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Url;

use marketplace_core::catalog::{
    CatalogApiTrait, Category, Product, ProductListRequest, ProductPage,
};
use marketplace_core::exchange::{ExchangeRate, ExchangeRateApiTrait};

use crate::error::{ApiClientError, Result};
use crate::types::*;

/// Client for the marketplace catalog API.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl MarketplaceClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            ApiClientError::invalid_request(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::invalid_request(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::invalid_request("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {} bytes", status, body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            return Err(ApiClientError::api(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize response. Body: {}, Error: {}", body, e);
            ApiClientError::from(e)
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// List one page of products. Unset filters are left out of the query.
    ///
    /// GET /products?page=&page_size=&...
    pub async fn get_products(&self, request: &ProductListRequest) -> Result<ProductPage> {
        let url = self.endpoint(&["products"])?;
        debug!("GET {} {:?}", url, request);

        let response = self.client.get(url).query(request).send().await?;
        let page: ProductListResponse = Self::parse_response(response).await?;
        Ok(page.into())
    }

    /// Get a single product.
    ///
    /// GET /products/{id}
    pub async fn get_product_by_id(&self, id: &str) -> Result<Product> {
        let url = self.endpoint(&["products", id])?;
        self.get(url).await
    }

    /// GET /categories
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let url = self.endpoint(&["categories"])?;
        let categories: CategoryListResponse = self.get(url).await?;
        Ok(categories.unwrap_or_default())
    }

    /// GET /brands
    pub async fn get_brands(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["brands"])?;
        let brands: BrandListResponse = self.get(url).await?;
        Ok(brands.unwrap_or_default())
    }

    /// GET /exchange/rate
    pub async fn get_exchange_rate(&self) -> Result<ExchangeRate> {
        let url = self.endpoint(&["exchange", "rate"])?;
        self.get(url).await
    }
}

#[async_trait]
impl CatalogApiTrait for MarketplaceClient {
    async fn list_products(
        &self,
        request: &ProductListRequest,
    ) -> marketplace_core::Result<ProductPage> {
        Ok(self.get_products(request).await?)
    }

    async fn get_product(&self, id: &str) -> marketplace_core::Result<Product> {
        match self.get_product_by_id(id).await {
            Ok(product) => Ok(product),
            // The backend rejects ids that are not UUIDs with 400; such a
            // product cannot exist.
            Err(ApiClientError::Api {
                status: 400,
                message,
            }) => Err(marketplace_core::Error::NotFound(message)),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_categories(&self) -> marketplace_core::Result<Vec<Category>> {
        Ok(self.get_categories().await?)
    }

    async fn list_brands(&self) -> marketplace_core::Result<Vec<String>> {
        Ok(self.get_brands().await?)
    }
}

#[async_trait]
impl ExchangeRateApiTrait for MarketplaceClient {
    async fn get_exchange_rate(&self) -> marketplace_core::Result<ExchangeRate> {
        Ok(MarketplaceClient::get_exchange_rate(self).await?)
    }
}
