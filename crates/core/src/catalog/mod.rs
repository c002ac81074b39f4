//! Catalog browsing: query state, listing orchestration, pagination and the
//! single-product lookup.

pub mod catalog_model;
pub mod catalog_service;
pub mod catalog_session;
pub mod catalog_traits;
pub mod pagination;
pub mod product_detail;
pub mod query_model;
pub mod query_store;

pub use catalog_model::*;
pub use catalog_service::{load_filter_options, CatalogLoader, CatalogView};
pub use catalog_session::{CatalogSession, SessionOptions};
pub use catalog_traits::CatalogApiTrait;
pub use pagination::{page_range, total_pages, PageToken, Pagination};
pub use product_detail::{load_product_detail, ProductDetail};
pub use query_model::{parse_price_input, QueryChange, QueryState};
pub use query_store::QueryStore;
