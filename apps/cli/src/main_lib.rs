use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use marketplace_api::MarketplaceClient;
use marketplace_core::catalog::CatalogApiTrait;
use marketplace_core::exchange::ExchangeRateApiTrait;
use marketplace_core::settings::UiContext;

use crate::config::{Config, LogFormat};
use crate::prefs::FilePreferenceStore;

pub struct AppState {
    pub catalog: Arc<dyn CatalogApiTrait>,
    pub rates: Arc<dyn ExchangeRateApiTrait>,
    pub ui: Arc<UiContext>,
}

/// Logs go to stderr; stdout carries the rendered catalog.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// First non-empty of `LC_ALL`, `LC_MESSAGES`, `LANG`.
fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}

pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let client = Arc::new(MarketplaceClient::new(
        &config.api_base,
        config.request_timeout,
    )?);
    tracing::info!("Using catalog API at {}", client.base_url());

    let prefs = Arc::new(FilePreferenceStore::new(config.prefs_file.clone()));
    let ui = Arc::new(UiContext::load(prefs, system_language().as_deref()));
    tracing::debug!("UI locale {}", ui.locale());

    Ok(AppState {
        catalog: client.clone(),
        rates: client,
        ui,
    })
}
