//! Single-product lookup for the detail view.
//!
//! Unlike the listing, this path tells "not found" apart from transient
//! failures so the user can be sent back to the catalog.

use log::{debug, warn};
use rust_decimal::Decimal;

use super::catalog_model::Product;
use super::catalog_traits::CatalogApiTrait;
use crate::exchange::ExchangeRateApiTrait;

#[derive(Debug, Clone, PartialEq)]
pub enum ProductDetail {
    Loaded {
        product: Product,
        /// USDT rate at lookup time, absent when unavailable.
        rate: Option<Decimal>,
    },
    NotFound,
    LoadError(String),
}

impl ProductDetail {
    pub fn product(&self) -> Option<&Product> {
        match self {
            ProductDetail::Loaded { product, .. } => Some(product),
            _ => None,
        }
    }
}

/// Fetch a product and the current exchange rate concurrently.
///
/// A failed or non-positive rate only drops the USDT prices; it never fails
/// the lookup. A blank id is reported as not found without a request.
pub async fn load_product_detail(
    catalog: &dyn CatalogApiTrait,
    rates: &dyn ExchangeRateApiTrait,
    id: &str,
) -> ProductDetail {
    let id = id.trim();
    if id.is_empty() {
        return ProductDetail::NotFound;
    }

    let (product, rate) = futures::join!(catalog.get_product(id), rates.get_exchange_rate());

    let rate = match rate {
        Ok(rate) if rate.rate > Decimal::ZERO => Some(rate.rate),
        Ok(rate) => {
            warn!("Ignoring non-positive exchange rate {}", rate.rate);
            None
        }
        Err(e) => {
            warn!("Exchange rate unavailable for product {}: {}", id, e);
            None
        }
    };

    match product {
        Ok(product) => ProductDetail::Loaded { product, rate },
        Err(e) if e.is_not_found() => {
            debug!("Product {} not found", id);
            ProductDetail::NotFound
        }
        Err(e) => {
            warn!("Failed to load product {}: {}", id, e);
            ProductDetail::LoadError(e.to_string())
        }
    }
}
