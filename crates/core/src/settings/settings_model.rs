use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Preference key under which the chosen locale is stored.
pub const LOCALE_PREFERENCE_KEY: &str = "marketplace_lang";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Locale for a system language tag such as `ru_RU.UTF-8` or `en-US`.
    /// Anything that is not Russian falls back to English.
    pub fn from_system_language(language: &str) -> Self {
        if language.trim().to_ascii_lowercase().starts_with("ru") {
            Locale::Ru
        } else {
            Locale::En
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            other => Err(Error::Preferences(format!("Unsupported locale '{other}'"))),
        }
    }
}
