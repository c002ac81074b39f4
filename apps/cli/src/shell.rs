//! Interactive command loop over a mounted catalog session.
//!
//! Each input line is one edit. Search and price edits go through the
//! session's debounce gates, everything else applies immediately. The screen
//! is redrawn whenever the session publishes a new result.

use std::sync::Arc;

use anyhow::bail;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use marketplace_core::catalog::{
    load_product_detail, CatalogApiTrait, CatalogSession, FilterOptions,
};
use marketplace_core::exchange::ExchangeRateApiTrait;
use marketplace_core::settings::{Locale, UiContext};

use crate::render;

pub const HELP: &str = "\
commands:
  search <text>      search (empty clears)
  min <rub> | max <rub>  price bounds (empty clears)
  category <id|->    brand <name|->    sort <field:dir|->
  page <n>  next  prev  reset
  categories  brands  sorts  show  url
  product <id>       lang <en|ru>      help  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    MinPrice(String),
    MaxPrice(String),
    Category(String),
    Brand(String),
    Sort(String),
    Page(u32),
    Next,
    Previous,
    Reset,
    Categories,
    Brands,
    Sorts,
    Show,
    Url,
    Product(String),
    Lang(Locale),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        // `-` clears a selection.
        let selection = |value: &str| if value == "-" { String::new() } else { value.to_string() };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "min" => Command::MinPrice(rest.to_string()),
            "max" => Command::MaxPrice(rest.to_string()),
            "category" | "cat" => Command::Category(selection(rest)),
            "brand" => Command::Brand(selection(rest)),
            "sort" => Command::Sort(selection(rest)),
            "page" | "p" => match rest.parse::<u32>() {
                Ok(page) if page >= 1 => Command::Page(page),
                _ => bail!("page expects a number >= 1, got '{}'", rest),
            },
            "next" | "n" => Command::Next,
            "prev" | "previous" => Command::Previous,
            "reset" => Command::Reset,
            "categories" => Command::Categories,
            "brands" => Command::Brands,
            "sorts" => Command::Sorts,
            "show" | "ls" => Command::Show,
            "url" => Command::Url,
            "product" | "open" => {
                if rest.is_empty() {
                    bail!("product expects an id");
                }
                Command::Product(rest.to_string())
            }
            "lang" => Command::Lang(rest.parse()?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command '{}', type 'help'", other),
        };
        Ok(Some(command))
    }
}

pub struct Shell {
    session: CatalogSession,
    ui: Arc<UiContext>,
    catalog: Arc<dyn CatalogApiTrait>,
    rates: Arc<dyn ExchangeRateApiTrait>,
    filters: FilterOptions,
}

impl Shell {
    pub fn new(
        session: CatalogSession,
        ui: Arc<UiContext>,
        catalog: Arc<dyn CatalogApiTrait>,
        rates: Arc<dyn ExchangeRateApiTrait>,
        filters: FilterOptions,
    ) -> Self {
        Self {
            session,
            ui,
            catalog,
            rates,
            filters,
        }
    }

    /// Read commands from stdin until `quit` or end of input, then unmount.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut views = self.session.subscribe_view();
        let mut exchange = self.session.subscribe_exchange();
        let mut locale = self.ui.subscribe();

        println!("{}", HELP);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match Command::parse(&line) {
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => self.execute(command).await,
                        Ok(None) => {}
                        Err(e) => println!("{}", e),
                    }
                }
                changed = views.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let loading = views.borrow_and_update().loading;
                    if !loading {
                        self.show();
                    }
                }
                changed = exchange.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *exchange.borrow_and_update();
                    println!("{}", render::exchange_indicator(&state, &self.ui.messages()));
                }
                Ok(()) = locale.changed() => {
                    locale.borrow_and_update();
                    self.show();
                }
            }
        }

        self.session.teardown();
        self.ui.dispose();
        Ok(())
    }

    fn show(&self) {
        print!(
            "{}",
            render::catalog(&self.session.view(), &self.session.exchange(), &self.ui.messages())
        );
    }

    async fn execute(&self, command: Command) {
        debug!("Command {:?}", command);
        let messages = self.ui.messages();
        match command {
            Command::Search(text) => self.session.edit_search(&text),
            Command::MinPrice(raw) => self.session.edit_min_price(&raw),
            Command::MaxPrice(raw) => self.session.edit_max_price(&raw),
            Command::Category(id) => self.unchanged_hint(self.session.set_category(&id)),
            Command::Brand(brand) => self.unchanged_hint(self.session.set_brand(&brand)),
            Command::Sort(sort) => self.unchanged_hint(self.session.set_sort(&sort)),
            Command::Page(page) => self.unchanged_hint(self.session.set_page(page)),
            Command::Next => self.unchanged_hint(self.session.next_page()),
            Command::Previous => self.unchanged_hint(self.session.previous_page()),
            Command::Reset => self.unchanged_hint(self.session.reset()),
            Command::Categories => print!("{}", render::categories(&self.filters, &messages)),
            Command::Brands => print!("{}", render::brands(&self.filters, &messages)),
            Command::Sorts => print!("{}", render::sort_options(&messages)),
            Command::Show => self.show(),
            Command::Url => println!("?{}", self.session.url_query()),
            Command::Product(id) => {
                let detail =
                    load_product_detail(self.catalog.as_ref(), self.rates.as_ref(), &id).await;
                print!("{}", render::detail(&detail, &messages));
            }
            Command::Lang(locale) => {
                if let Err(e) = self.ui.set_locale(locale) {
                    warn!("Locale switched but not saved: {}", e);
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    fn unchanged_hint(&self, changed: bool) {
        if !changed {
            println!("(no change) ?{}", self.session.url_query());
        }
    }
}
