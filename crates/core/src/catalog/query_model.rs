//! Canonical catalog query and its URL query-string form.
//!
//! URL schema: `search`, `category_id`, `brand`, `min_price`, `max_price`,
//! `sort`, `page`. An absent parameter means the default value, and default
//! values are never written, so the all-default query serializes to an empty
//! string.

use serde::Serialize;

use crate::errors::{Error, Result};

/// The active filters, sort order and page of the catalog view.
///
/// Invariant: `page >= 1`. The page size is a session constant and is not
/// part of this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search: String,
    pub category_id: String,
    pub brand: String,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// `field:direction`, comma separated for multiple keys. Empty means the
    /// server default.
    pub sort_fields: String,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_id: String::new(),
            brand: String::new(),
            min_price: None,
            max_price: None,
            sort_fields: String::new(),
            page: 1,
        }
    }
}

/// A single edit to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Search(String),
    Category(String),
    Brand(String),
    MinPrice(Option<u64>),
    MaxPrice(Option<u64>),
    Sort(String),
    Page(u32),
    /// Clear every filter. The sort order is kept.
    Reset,
}

impl QueryChange {
    pub fn is_page_change(&self) -> bool {
        matches!(self, Self::Page(_))
    }
}

/// Parameters as they appear in the URL. Field order is the write order.
#[derive(Serialize)]
struct UrlParams<'a> {
    #[serde(skip_serializing_if = "is_blank")]
    search: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    category_id: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    brand: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_price: Option<u64>,
    #[serde(skip_serializing_if = "is_blank")]
    sort: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

impl QueryState {
    /// Apply one edit.
    ///
    /// Any edit other than [`QueryChange::Page`] also moves back to page 1 in
    /// the same step. Returns whether anything changed; re-applying the
    /// current value while already on page 1 is a no-op.
    pub fn apply(&mut self, change: QueryChange) -> bool {
        let before = self.clone();
        match change {
            QueryChange::Search(value) => self.search = value,
            QueryChange::Category(value) => self.category_id = value,
            QueryChange::Brand(value) => self.brand = value,
            QueryChange::MinPrice(value) => self.min_price = value,
            QueryChange::MaxPrice(value) => self.max_price = value,
            QueryChange::Sort(value) => self.sort_fields = value,
            QueryChange::Page(page) => {
                self.page = page.max(1);
                return *self != before;
            }
            QueryChange::Reset => {
                *self = Self {
                    sort_fields: std::mem::take(&mut self.sort_fields),
                    ..Self::default()
                };
            }
        }
        self.page = 1;
        *self != before
    }

    /// Whether any filter is active. Sort and page are not filters.
    pub fn has_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.category_id.is_empty()
            || !self.brand.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    /// Serialize to a URL query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let params = UrlParams {
            search: &self.search,
            category_id: &self.category_id,
            brand: &self.brand,
            min_price: self.min_price,
            max_price: self.max_price,
            sort: &self.sort_fields,
            page: (self.page > 1).then_some(self.page),
        };
        // Only strings and integers: encoding cannot fail.
        serde_urlencoded::to_string(&params).unwrap_or_default()
    }

    /// Parse a URL query string, with or without the leading `?`.
    ///
    /// Unknown parameters are ignored. Malformed numbers fall back to the
    /// default (`page = 1`, no price bound). When a parameter repeats, the
    /// last occurrence wins.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| Error::InvalidQuery(format!("{query}: {e}")))?;

        let mut state = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "search" => state.search = value,
                "category_id" => state.category_id = value,
                "brand" => state.brand = value,
                "min_price" => state.min_price = parse_price_input(&value),
                "max_price" => state.max_price = parse_price_input(&value),
                "sort" => state.sort_fields = value,
                "page" => state.page = parse_page(&value),
                _ => {}
            }
        }
        Ok(state)
    }
}

/// Interpret raw price box text. Empty, negative or non-numeric input means
/// "no bound".
pub fn parse_price_input(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

fn parse_page(raw: &str) -> u32 {
    raw.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
}
