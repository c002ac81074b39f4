use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query_model::QueryState;
use crate::constants::DEFAULT_SORT;

/// A catalog product as served by `GET /products` and `GET /products/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub external_id: String,
    pub sku: String,
    pub name: String,
    /// Price before discount, whole roubles.
    pub original_price: i64,
    /// Current price, whole roubles.
    pub price: i64,
    pub image_url: String,
    pub product_url: String,
    pub brand: String,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Amount saved against the original price, if there is a discount.
    pub fn discount(&self) -> Option<i64> {
        self.original_price
            .checked_sub(self.price)
            .filter(|diff| *diff > 0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for `GET /products`.
///
/// Only `page` and `page_size` are always present. Every filter is omitted
/// when it holds its default value, so the server never sees empty strings.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProductListRequest {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ProductListRequest {
    pub fn from_query(query: &QueryState, page_size: u32) -> Self {
        fn non_empty(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        Self {
            page: query.page.max(1),
            page_size,
            sort_fields: non_empty(&query.sort_fields),
            category_id: non_empty(&query.category_id),
            brand: non_empty(&query.brand),
            min_price: query.min_price,
            max_price: query.max_price,
            search: non_empty(&query.search),
        }
    }
}

/// A page of products as returned by the API client, with a `null` product
/// list already normalized to an empty one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// What the catalog view displays for one query.
///
/// Superseded wholesale by the next successful fetch. A failed fetch yields
/// [`FetchResult::fallback`], which reads as "no data" rather than as stale
/// data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchResult {
    /// Never longer than `page_size`.
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl FetchResult {
    /// The empty result substituted for any failed listing fetch.
    pub fn fallback(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
        }
    }

    /// Build a result from an API page, enforcing `items.len() <= page_size`.
    pub fn from_page(mut page: ProductPage, requested: &ProductListRequest) -> Self {
        let page_size = requested.page_size;
        if page.products.len() > page_size as usize {
            log::warn!(
                "Server returned {} products for page_size {}, truncating",
                page.products.len(),
                page_size
            );
            page.products.truncate(page_size as usize);
        }
        Self {
            items: page.products,
            total: page.total,
            page: requested.page,
            page_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Entries of the sort menu. The default entry is what the server applies
/// when no sort is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const SORT_OPTIONS: &[SortOption] = &[
    SortOption {
        value: DEFAULT_SORT,
        label: "Newest",
    },
    SortOption {
        value: "price:asc",
        label: "Price: Low to High",
    },
    SortOption {
        value: "price:desc",
        label: "Price: High to Low",
    },
    SortOption {
        value: "name:asc",
        label: "Name: A-Z",
    },
    SortOption {
        value: "name:desc",
        label: "Name: Z-A",
    },
    SortOption {
        value: "brand:asc",
        label: "Brand",
    },
];

/// Choices for the category and brand filter controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub categories: Vec<Category>,
    pub brands: Vec<String>,
}
