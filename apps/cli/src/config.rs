use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use marketplace_core::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub log_format: LogFormat,
    pub prefs_file: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = var("MP_API_BASE")
            .unwrap_or_else(|| "http://localhost:8080/api/v1".into())
            .trim_end_matches('/')
            .to_string();

        let timeout_ms: u64 = match var("MP_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid MP_REQUEST_TIMEOUT_MS '{}'", raw))?,
            None => 30_000,
        };

        let page_size: u32 = match var("MP_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid MP_PAGE_SIZE '{}'", raw))?,
            None => DEFAULT_PAGE_SIZE,
        };
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            bail!("MP_PAGE_SIZE must be between 1 and {}, got {}", MAX_PAGE_SIZE, page_size);
        }

        let log_format = match var("MP_LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(raw) => bail!("Invalid MP_LOG_FORMAT '{}', expected text or json", raw),
            None => LogFormat::Text,
        };

        let prefs_file = var("MP_PREFS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./marketplace_prefs.json"));

        Ok(Self {
            api_base,
            request_timeout: Duration::from_millis(timeout_ms),
            page_size,
            log_format,
            prefs_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/api/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 24);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.prefs_file, PathBuf::from("./marketplace_prefs.json"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("MP_API_BASE", "https://shop.example.com/api/v1/"),
            ("MP_REQUEST_TIMEOUT_MS", "1500"),
            ("MP_PAGE_SIZE", "48"),
            ("MP_LOG_FORMAT", "JSON"),
            ("MP_PREFS_FILE", "/tmp/prefs.json"),
        ])
        .unwrap();
        assert_eq!(config.api_base, "https://shop.example.com/api/v1");
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.page_size, 48);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.prefs_file, PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config(&[("MP_REQUEST_TIMEOUT_MS", "soon")]).is_err());
        assert!(config(&[("MP_PAGE_SIZE", "0")]).is_err());
        assert!(config(&[("MP_PAGE_SIZE", "101")]).is_err());
        assert!(config(&[("MP_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("MP_PAGE_SIZE", "  "), ("MP_API_BASE", "")]).unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.api_base, "http://localhost:8080/api/v1");
    }
}
