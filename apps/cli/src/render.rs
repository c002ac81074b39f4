//! Plain-text rendering of the catalog and detail views.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use marketplace_core::catalog::{CatalogView, FilterOptions, Product, ProductDetail, QueryState, SORT_OPTIONS};
use marketplace_core::exchange::PollState;
use marketplace_core::settings::Messages;
use marketplace_core::utils::{format_rub, format_usdt, resolve_image_url};

/// One product row: name, brand, price, optional discount and USDT price.
pub fn product_line(product: &Product, rate: Option<Decimal>) -> String {
    let mut line = format!("{}  [{}]  {}", product.name, product.brand, format_rub(product.price));
    if let Some(discount) = product.discount() {
        let _ = write!(
            line,
            "  (was {}, -{})",
            format_rub(product.original_price),
            format_rub(discount)
        );
    }
    if let Some(rate) = rate {
        let _ = write!(line, "  ~{}", format_usdt(product.price, rate));
    }
    let _ = write!(line, "  #{}", product.id);
    line
}

pub fn exchange_indicator(state: &PollState, messages: &Messages) -> String {
    messages.exchange_rate(state.usable_rate())
}

/// Summary of the active query, e.g. `brand=Apple min=1 000 ₽ sort=Newest`.
pub fn query_summary(query: &QueryState, messages: &Messages) -> String {
    let mut parts = Vec::new();
    if !query.search.is_empty() {
        parts.push(format!("search=\"{}\"", query.search));
    }
    if !query.category_id.is_empty() {
        parts.push(format!("category={}", query.category_id));
    }
    if !query.brand.is_empty() {
        parts.push(format!("brand={}", query.brand));
    }
    if let Some(min) = query.min_price {
        parts.push(format!("min={}", format_rub(i64::try_from(min).unwrap_or(i64::MAX))));
    }
    if let Some(max) = query.max_price {
        parts.push(format!("max={}", format_rub(i64::try_from(max).unwrap_or(i64::MAX))));
    }
    if !query.sort_fields.is_empty() {
        let label = messages
            .sort_label(&query.sort_fields)
            .unwrap_or(query.sort_fields.as_str());
        parts.push(format!("sort={}", label));
    }
    parts.join(" ")
}

/// The full catalog screen.
pub fn catalog(view: &CatalogView, exchange: &PollState, messages: &Messages) -> String {
    let mut out = String::new();
    let rate = exchange.usable_rate();

    let _ = writeln!(
        out,
        "{}    {}",
        messages.product_count(view.result.total),
        exchange_indicator(exchange, messages)
    );
    let summary = query_summary(&view.query, messages);
    if !summary.is_empty() {
        let _ = writeln!(out, "{}", summary);
    }

    if view.result.is_empty() {
        let _ = writeln!(out, "{}. {}.", messages.empty(), messages.empty_hint());
    } else {
        let offset = u64::from(view.result.page.saturating_sub(1)) * u64::from(view.result.page_size);
        for (i, product) in view.result.items.iter().enumerate() {
            let _ = writeln!(out, "{:>4}. {}", offset + i as u64 + 1, product_line(product, rate));
        }
    }

    if let Some(pagination) = view.pagination() {
        let _ = writeln!(out, "{}", pagination);
    }
    out
}

pub fn detail(detail: &ProductDetail, messages: &Messages) -> String {
    let mut out = String::new();
    match detail {
        ProductDetail::Loaded { product, rate } => {
            let _ = writeln!(out, "{}", product.name);
            let _ = writeln!(out, "{}: {}", messages.brand(), product.brand);
            let _ = writeln!(out, "{}: {}", messages.sku(), product.sku);
            let _ = write!(out, "{}", format_rub(product.price));
            if let Some(discount) = product.discount() {
                let _ = write!(
                    out,
                    "  (was {}, -{})",
                    format_rub(product.original_price),
                    format_rub(discount)
                );
            }
            let _ = writeln!(out);
            if let Some(rate) = rate {
                let _ = writeln!(out, "~{}", format_usdt(product.price, *rate));
            }
            let image = resolve_image_url(&product.image_url);
            if !image.is_empty() {
                let _ = writeln!(out, "{}", image);
            }
            if !product.product_url.is_empty() {
                let _ = writeln!(out, "{}", product.product_url);
            }
        }
        ProductDetail::NotFound => {
            let _ = writeln!(out, "{}", messages.not_found());
        }
        ProductDetail::LoadError(reason) => {
            let _ = writeln!(out, "{} ({})", messages.load_error(), reason);
        }
    }
    let _ = writeln!(out, "<- {}", messages.back_to_catalog());
    out
}

pub fn categories(options: &FilterOptions, messages: &Messages) -> String {
    let mut out = format!("- : {}\n", messages.all_categories());
    for category in &options.categories {
        let _ = writeln!(out, "{} : {}", category.id, category.name);
    }
    out
}

pub fn brands(options: &FilterOptions, messages: &Messages) -> String {
    let mut out = format!("- : {}\n", messages.all_brands());
    for brand in &options.brands {
        let _ = writeln!(out, "{}", brand);
    }
    out
}

pub fn sort_options(messages: &Messages) -> String {
    let mut out = String::new();
    for option in SORT_OPTIONS {
        let label = messages.sort_label(option.value).unwrap_or(option.label);
        let _ = writeln!(out, "{} : {}", option.value, label);
    }
    out
}
