use std::time::Duration;

/// Products per catalog page. Fixed for the lifetime of a session.
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Upper bound the backend accepts for `page_size`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Quiet period before free-text search input is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Quiet period before price bound input is applied.
pub const PRICE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Exchange rate refresh interval.
pub const EXCHANGE_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Origin used to resolve relative product image paths.
pub const IMAGE_ORIGIN: &str = "https://store77.net";

/// Sort order applied by the server when none is requested.
pub const DEFAULT_SORT: &str = "created_at:desc";
