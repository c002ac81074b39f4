use async_trait::async_trait;

use super::exchange_model::ExchangeRate;
use crate::errors::Result;

/// Source of the current USDT → RUB rate.
#[async_trait]
pub trait ExchangeRateApiTrait: Send + Sync {
    /// `GET /exchange/rate`
    async fn get_exchange_rate(&self) -> Result<ExchangeRate>;
}
