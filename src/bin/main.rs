// Console driver for the product search client
//
// Runs the same state managers the browser uses, against a live backend:
// - validate / submit a query
// - page through and prune the search history
// - page and sort the results of a query, mirroring filters in a URL

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use product_search_client::web_app::model::SortField;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "product-search")]
#[command(version)]
#[command(about = "Validate, submit and browse product searches")]
struct Args {
    /// API base URL (overrides PRODUCT_SEARCH_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate how many results a query would return
    Validate { query: String },

    /// Validate a query, then submit it when --yes is given
    Submit {
        query: String,
        /// Start the search without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a page of the search history
    History {
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Delete a history entry; --page is the page it is listed on
    Delete {
        id: i64,
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Show the results of a submitted query
    Results {
        id: i64,
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Initial sort, as a URL query string: "price=desc&name=asc"
        #[arg(long, default_value = "")]
        filters: String,
        /// Click a column header (repeatable): name, brand, supplier,
        /// supplierRating, reviewRating, feedbacks, price
        #[arg(long = "cycle")]
        cycle: Vec<SortField>,
    },
}

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use product_search_client::web_app::api::{ApiConfig, HttpGateway};
    use tracing_subscriber::EnvFilter;

    dotenv::dotenv().ok();

    // Logs go to stderr so tables on stdout stay clean
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(url) = args.api_url {
        config = config.with_base_url(url);
    }
    tracing::info!("Using API at {}", config.base_url);

    let gateway = HttpGateway::new(config)?;
    commands::run(args.command, gateway).await
}

#[cfg(feature = "cli")]
mod commands {
    use anyhow::bail;
    use product_search_client::web_app::api::ApiGateway;
    use product_search_client::web_app::model::{HistoryPage, ResultsPage, SortDirection, SortField};
    use product_search_client::web_app::state::pagination::{can_step, page_window, PageSlot};
    use product_search_client::web_app::state::{
        MemoryFilterPort, RequestOutcome, ResultsManager, SearchManager, ValidationState,
    };

    use super::Command;

    pub async fn run<G: ApiGateway>(command: Command, gateway: G) -> anyhow::Result<()> {
        match command {
            Command::Validate { query } => {
                let manager = SearchManager::new(gateway);
                manager.edit(query);
                manager.validate(None).await;
                report_validation(&manager)?;
            }
            Command::Submit { query, yes } => {
                let manager = SearchManager::new(gateway);
                manager.edit(query);
                manager.validate(None).await;
                report_validation(&manager)?;
                if !yes {
                    println!("Re-run with --yes to start the search.");
                    return Ok(());
                }
                if manager.confirm(None).await == RequestOutcome::Applied {
                    println!("Search started.");
                }
                fail_on_error(manager.error())?;
                print_history(&manager.history());
            }
            Command::History { page } => {
                let manager = SearchManager::new(gateway);
                manager.fetch_history(Some(page), true).await;
                fail_on_error(manager.error())?;
                print_history(&manager.history());
            }
            Command::Delete { id, page } => {
                let manager = SearchManager::new(gateway);
                manager.fetch_history(Some(page), true).await;
                manager.remove(id).await;
                fail_on_error(manager.error())?;
                println!("Deleted entry {}.", id);
                print_history(&manager.history());
            }
            Command::Results {
                id,
                page,
                filters,
                cycle,
            } => {
                let port = MemoryFilterPort::new(filters);
                let manager = ResultsManager::new(id, gateway, port.clone());
                manager.load().await;
                for field in cycle {
                    manager.cycle_sort(field).await;
                }
                manager.change_page(page).await;
                fail_on_error(manager.error())?;
                print_results(&manager.page());
                println!("url: ?{}", port.query_string());
            }
        }
        Ok(())
    }

    fn fail_on_error(error: Option<impl std::fmt::Display>) -> anyhow::Result<()> {
        match error {
            Some(e) => bail!("{}", e),
            None => Ok(()),
        }
    }

    fn report_validation<G: ApiGateway>(manager: &SearchManager<G>) -> anyhow::Result<()> {
        fail_on_error(manager.error())?;
        if let ValidationState::Validated { total } = manager.validation() {
            println!("'{}' would return about {} products.", manager.query(), total);
        }
        Ok(())
    }

    fn pager(current: u32, total: u32) -> String {
        let buttons = page_window(current, total)
            .into_iter()
            .map(|slot| match slot {
                PageSlot::Page(p) if p == current => format!("[{}]", p),
                PageSlot::Page(p) => p.to_string(),
                PageSlot::Gap => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        if buttons.is_empty() {
            return buttons;
        }
        let (prev, next) = can_step(current, total);
        format!(
            "{} {} {}",
            if prev { "<" } else { " " },
            buttons,
            if next { ">" } else { " " }
        )
    }

    fn print_history(history: &HistoryPage) {
        if history.entries.is_empty() {
            println!("No searches yet.");
            return;
        }
        println!("{:>6}  {:<16}  {:<11}  {:>7}  query", "id", "created", "status", "total");
        for entry in &history.entries {
            println!(
                "{:>6}  {:<16}  {:<11}  {:>7}  {}",
                entry.id,
                entry.created_at.format("%d.%m.%Y %H:%M").to_string(),
                if entry.is_completed { "done" } else { "in progress" },
                entry.total_results,
                entry.query_text
            );
        }
        println!(
            "{} searches, page {}/{}  {}",
            history.total_count,
            history.current_page,
            history.total_pages,
            pager(history.current_page, history.total_pages)
        );
    }

    fn header(page: &ResultsPage, field: SortField, label: &str) -> String {
        match page.filters.get(field) {
            Some(SortDirection::Asc) => format!("{}↑", label),
            Some(SortDirection::Desc) => format!("{}↓", label),
            None => label.to_string(),
        }
    }

    fn print_results(page: &ResultsPage) {
        if let Some(info) = &page.query_info {
            let status = if info.is_completed { "done" } else { "in progress" };
            println!("Results for '{}' ({}, {} found)", info.query_text, status, info.total_results);
        }
        println!(
            "{:<40}  {:<16}  {:<20}  {:>8}  {:>8}  {:>9}  {:>9}",
            header(page, SortField::Name, "name"),
            header(page, SortField::Brand, "brand"),
            header(page, SortField::Supplier, "supplier"),
            header(page, SortField::SupplierRating, "seller"),
            header(page, SortField::ReviewRating, "rating"),
            header(page, SortField::Feedbacks, "reviews"),
            header(page, SortField::Price, "price"),
        );
        for item in &page.items {
            println!(
                "{:<40}  {:<16}  {:<20}  {:>8.1}  {:>8.1}  {:>9}  {:>9}",
                truncate(&item.name, 40),
                truncate(&item.brand, 16),
                truncate(&item.supplier, 20),
                item.supplier_rating,
                item.review_rating,
                item.feedbacks,
                item.price
            );
        }
        println!(
            "{} products, page {}/{}  {}",
            page.total_count,
            page.current_page,
            page.total_pages,
            pager(page.current_page, page.total_pages)
        );
    }

    fn truncate(text: &str, width: usize) -> String {
        if text.chars().count() <= width {
            text.to_string()
        } else {
            let cut: String = text.chars().take(width.saturating_sub(1)).collect();
            format!("{}…", cut)
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("This binary requires the 'cli' feature. Run with: cargo run --features cli");
}
