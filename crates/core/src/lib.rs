//! Marketplace Core - catalog query state, fetch orchestration and the
//! exchange rate poll.
//!
//! This crate is transport-agnostic. It defines the API traits it consumes;
//! the `api` crate implements them over HTTP.

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod exchange;
pub mod settings;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use catalog::{
    CatalogApiTrait, CatalogSession, FetchResult, Pagination, Product, QueryState, QueryStore,
};
pub use exchange::{ExchangeRate, ExchangeRateApiTrait, PollState};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
