//! Display helpers for prices and product media.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::constants::IMAGE_ORIGIN;

/// Placeholder shown when a converted price cannot be computed.
pub const UNAVAILABLE: &str = "—";

/// Format a whole-rouble price the way ru-RU locales do: digits grouped by
/// three with no-break spaces and a trailing `₽`.
pub fn format_rub(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }
    let sign = if price < 0 { "-" } else { "" };
    format!("{sign}{grouped}\u{a0}₽")
}

/// Convert a rouble price to USDT at `rate` roubles per USDT.
///
/// Returns `None` for a non-positive rate or when the quotient does not fit
/// in a `Decimal`.
pub fn convert_to_usdt(price: i64, rate: Decimal) -> Option<Decimal> {
    if rate <= Decimal::ZERO {
        return None;
    }
    Decimal::from(price)
        .checked_div(rate)
        .map(|amount| amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// `"<amount> USDT"` with two decimals, or [`UNAVAILABLE`].
pub fn format_usdt(price: i64, rate: Decimal) -> String {
    match convert_to_usdt(price, rate) {
        Some(amount) => format!("{:.2} USDT", amount),
        None => UNAVAILABLE.to_string(),
    }
}

/// Format an exchange rate for the indicator badge.
pub fn format_rate(rate: Decimal) -> String {
    format!(
        "{:.2}",
        rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Make a product image path absolute. Scraped images are frequently stored
/// as paths relative to the store origin.
pub fn resolve_image_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http") {
        return url.to_string();
    }
    format!("{IMAGE_ORIGIN}{url}")
}
