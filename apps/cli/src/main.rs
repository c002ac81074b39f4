mod config;
mod main_lib;
mod prefs;
mod render;
mod shell;

use std::time::Duration;

use clap::Parser;

use config::Config;
use main_lib::{build_state, init_tracing};
use marketplace_core::catalog::{
    load_filter_options, load_product_detail, CatalogSession, QueryStore, SessionOptions,
};
use shell::Shell;

/// Browse the marketplace catalog from the terminal.
#[derive(Parser, Debug)]
#[command(name = "marketplace", version, about)]
struct Cli {
    /// Initial catalog state as a URL query string, e.g. "brand=Apple&page=2"
    #[arg(long)]
    query: Option<String>,

    /// Show one product and exit
    #[arg(long, value_name = "ID", conflicts_with_all = ["query", "once"])]
    product: Option<String>,

    /// Print the first page of results and exit
    #[arg(long)]
    once: bool,
}

/// How long `--once` waits for the first exchange rate before printing without it.
const FIRST_RATE_WAIT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    let state = build_state(&config)?;

    if let Some(id) = cli.product {
        let detail = load_product_detail(state.catalog.as_ref(), state.rates.as_ref(), &id).await;
        print!("{}", render::detail(&detail, &state.ui.messages()));
        state.ui.dispose();
        return Ok(());
    }

    let store = match cli.query.as_deref() {
        Some(query) => QueryStore::from_url(query)?,
        None => QueryStore::default(),
    };
    let session = CatalogSession::mount(
        store,
        state.catalog.clone(),
        state.rates.clone(),
        SessionOptions {
            page_size: config.page_size,
            ..SessionOptions::default()
        },
    );

    if cli.once {
        let mut views = session.subscribe_view();
        views.wait_for(|v| !v.loading && v.generation > 0).await?;
        let mut exchange = session.subscribe_exchange();
        // A failed first poll leaves the rate unset without notifying.
        let _ = tokio::time::timeout(FIRST_RATE_WAIT, exchange.wait_for(|s| s.rate.is_some())).await;

        print!(
            "{}",
            render::catalog(&session.view(), &session.exchange(), &state.ui.messages())
        );
        session.teardown();
        state.ui.dispose();
        return Ok(());
    }

    let filters = load_filter_options(state.catalog.as_ref()).await;
    Shell::new(session, state.ui, state.catalog, state.rates, filters)
        .run()
        .await
}
