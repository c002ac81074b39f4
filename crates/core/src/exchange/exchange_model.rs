use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// USDT → RUB rate as served by `GET /exchange/rate`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    /// Roubles per USDT.
    pub rate: Decimal,
}

/// State of the exchange rate indicator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollState {
    /// Last fetched rate, `None` while unknown or after a failed tick.
    pub rate: Option<Decimal>,
    /// True while the owning surface is mounted.
    pub active: bool,
}

impl PollState {
    /// The rate if it is usable for conversions.
    pub fn usable_rate(&self) -> Option<Decimal> {
        self.rate.filter(|rate| *rate > Decimal::ZERO)
    }
}
