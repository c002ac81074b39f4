//! Strings the catalog surfaces render, in each supported locale.

use rust_decimal::Decimal;

use super::settings_model::Locale;
use crate::utils::format_rate;

/// Message lookup bound to one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// "24 products" / "24 товара", with the plural form the locale needs.
    pub fn product_count(&self, count: u64) -> String {
        match self.locale {
            Locale::En => match count {
                1 => "1 product".to_string(),
                n => format!("{n} products"),
            },
            Locale::Ru => {
                let noun = match (count % 10, count % 100) {
                    (1, m) if m != 11 => "товар",
                    (2..=4, m) if !(12..=14).contains(&m) => "товара",
                    _ => "товаров",
                };
                format!("{count} {noun}")
            }
        }
    }

    pub fn empty(&self) -> &'static str {
        self.pick("No products found", "Товары не найдены")
    }

    pub fn empty_hint(&self) -> &'static str {
        self.pick("Try adjusting your filters", "Попробуйте изменить фильтры")
    }

    pub fn loading(&self) -> &'static str {
        self.pick("Loading...", "Загрузка...")
    }

    pub fn not_found(&self) -> &'static str {
        self.pick("Product not found", "Товар не найден")
    }

    pub fn load_error(&self) -> &'static str {
        self.pick("Failed to load product", "Не удалось загрузить товар")
    }

    pub fn back_to_catalog(&self) -> &'static str {
        self.pick("Back to catalog", "Назад в каталог")
    }

    pub fn all_categories(&self) -> &'static str {
        self.pick("All categories", "Все категории")
    }

    pub fn all_brands(&self) -> &'static str {
        self.pick("All brands", "Все бренды")
    }

    pub fn brand(&self) -> &'static str {
        self.pick("Brand", "Бренд")
    }

    pub fn sku(&self) -> &'static str {
        self.pick("SKU", "Артикул")
    }

    /// Exchange indicator text; `None` or a non-positive rate reads as
    /// unavailable.
    pub fn exchange_rate(&self, rate: Option<Decimal>) -> String {
        match rate.filter(|r| *r > Decimal::ZERO) {
            Some(rate) => format!("1 USDT = {} RUB", format_rate(rate)),
            None => "USDT —".to_string(),
        }
    }

    /// Localized label of a sort menu entry.
    pub fn sort_label(&self, value: &str) -> Option<&'static str> {
        let label = match value {
            "created_at:desc" => self.pick("Newest", "Новые"),
            "price:asc" => self.pick("Price: Low to High", "Цена: по возрастанию"),
            "price:desc" => self.pick("Price: High to Low", "Цена: по убыванию"),
            "name:asc" => self.pick("Name: A-Z", "Название: А-Я"),
            "name:desc" => self.pick("Name: Z-A", "Название: Я-А"),
            "brand:asc" => self.pick("Brand", "Бренд"),
            _ => return None,
        };
        Some(label)
    }

    fn pick(&self, en: &'static str, ru: &'static str) -> &'static str {
        match self.locale {
            Locale::En => en,
            Locale::Ru => ru,
        }
    }
}
