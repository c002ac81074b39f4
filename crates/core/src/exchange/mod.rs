pub mod exchange_model;
pub mod exchange_poller;
pub mod exchange_traits;

pub use exchange_model::{ExchangeRate, PollState};
pub use exchange_poller::ExchangeRatePoller;
pub use exchange_traits::ExchangeRateApiTrait;
