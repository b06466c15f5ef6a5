//! # Stockroom Admin CLI
//!
//! Command-line shell over [`AdminClient`]. The session is restored from
//! disk on start, so `login` once and the other commands reuse it until the
//! refresh token runs out.
//!
//! ```text
//! stockroom-admin login --email admin@toko.id --password ...
//! stockroom-admin dashboard --time-filter last_week
//! stockroom-admin list products --search kopi --page 2
//! stockroom-admin quotation Q-0012 approve
//! stockroom-admin report sales --from 2024-01-01 --to 2024-01-31 --period daily
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use stockroom_client::state::EntityRecord;
use stockroom_client::{AdminClient, ClientConfig, SessionEvent};
use stockroom_core::{
    ListFilter, LoginCredentials, ProductFilter, ReportFilter, ReportPeriod, TimeFilter,
};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "stockroom-admin", version, about = "Stockroom inventory admin")]
struct Cli {
    /// Path to client.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Totals for the whole business and for a time window
    Dashboard {
        #[arg(long, default_value_t = TimeFilter::default())]
        time_filter: TimeFilter,
    },
    /// List one page of a resource
    List {
        resource: Resource,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Move a quotation through its lifecycle
    Quotation { id: String, action: QuotationStep },
    /// Move a purchase through its lifecycle
    Purchase { id: String, action: PurchaseStep },
    /// Complete or cancel a stock movement
    Movement { id: i64, action: MovementStep },
    /// Sales, purchases or inventory report for a date range
    Report {
        kind: ReportArg,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        period: Option<PeriodArg>,
        #[arg(long)]
        store: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resource {
    Categories,
    Stores,
    Accounts,
    Products,
    Quotations,
    Purchases,
    StockMovements,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuotationStep {
    Send,
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PurchaseStep {
    Order,
    Receive,
    Cancel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MovementStep {
    Complete,
    Cancel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportArg {
    Sales,
    Purchases,
    Inventory,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PeriodArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<PeriodArg> for ReportPeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Daily => ReportPeriod::Daily,
            PeriodArg::Weekly => ReportPeriod::Weekly,
            PeriodArg::Monthly => ReportPeriod::Monthly,
            PeriodArg::Yearly => ReportPeriod::Yearly,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config).context("Failed to load client config")?;
    let admin = AdminClient::new(config).context("Failed to start admin client")?;
    let mut events = admin.subscribe();

    let outcome = run(&admin, cli.command).await;

    // A refresh that failed mid-command leaves an Expired event behind.
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Expired) => {
                eprintln!("Session expired, run `stockroom-admin login` again.");
            }
            Ok(event) => debug!(?event, "Session event"),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    outcome
}

const DEFAULT_LOG_FILTER: &str = "info,stockroom=debug";

/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom_client=trace` - Trace the client only
/// - Default: INFO, DEBUG for the stockroom crates
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn run(admin: &AdminClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            admin.auth.login(&LoginCredentials::new(email, password)).await?;
            match admin.auth.user() {
                Some(user) => println!("Logged in as {} <{}>", user.fullname, user.email),
                None => println!("Logged in"),
            }
        }
        Command::Logout => {
            admin.auth.logout().await;
            println!("Logged out");
        }
        Command::Whoami => {
            if !admin.auth.require_auth().await {
                bail!("Not logged in");
            }
            match admin.auth.user() {
                Some(user) => println!(
                    "{} <{}> (since {})",
                    user.fullname, user.email, user.usercreated
                ),
                None => bail!("Logged in, but the profile could not be loaded"),
            }
        }
        Command::Dashboard { time_filter } => {
            // Each fetch clears the previous error, so check after each one.
            admin.dashboard.fetch_general().await;
            if let Some(error) = admin.dashboard.snapshot().error {
                bail!(error);
            }
            admin.dashboard.fetch_specific(time_filter).await;

            let record = admin.dashboard.snapshot();
            if let Some(error) = record.error {
                bail!(error);
            }
            if let Some(general) = record.general {
                println!("Customers        {}", general.total_customers);
                println!("Suppliers        {}", general.total_suppliers);
                println!("Stores           {}", general.total_stores);
                println!("Products         {}", general.total_products);
            }
            if let Some(specific) = record.specific {
                println!("-- {} --", record.time_filter);
                println!("Quotations       {}", specific.total_quotations);
                println!("Purchases        {}", specific.total_purchases);
                println!("Stock in         {}", specific.total_stock_movements_in);
                println!("Stock out        {}", specific.total_stock_movements_out);
            }
        }
        Command::List {
            resource,
            search,
            page,
        } => list(admin, resource, list_filter(search, page)).await?,
        Command::Quotation { id, action } => {
            let quotation = match action {
                QuotationStep::Send => admin.quotations.send(&id).await?,
                QuotationStep::Approve => admin.quotations.approve(&id).await?,
                QuotationStep::Reject => admin.quotations.reject(&id).await?,
            };
            println!("{} is now {}", quotation.quotation_number, quotation.status);
        }
        Command::Purchase { id, action } => {
            let purchase = match action {
                PurchaseStep::Order => admin.purchases.order(&id).await?,
                PurchaseStep::Receive => admin.purchases.receive(&id).await?,
                PurchaseStep::Cancel => admin.purchases.cancel(&id).await?,
            };
            println!("{} is now {}", purchase.purchase_number, purchase.status);
        }
        Command::Movement { id, action } => {
            let movement = match action {
                MovementStep::Complete => admin.stock_movements.complete(id).await?,
                MovementStep::Cancel => admin.stock_movements.cancel(id).await?,
            };
            match movement.status {
                Some(status) => println!("Movement {} is now {}", movement.id, status),
                None => println!("Movement {} updated", movement.id),
            }
        }
        Command::Report {
            kind,
            from,
            to,
            period,
            store,
        } => {
            let mut filter = ReportFilter::new(from, to);
            filter.period = period.map(Into::into);
            filter.store_id = store;

            let json = match kind {
                ReportArg::Sales => serde_json::to_string_pretty(&admin.reports.sales(&filter).await?)?,
                ReportArg::Purchases => {
                    serde_json::to_string_pretty(&admin.reports.purchases(&filter).await?)?
                }
                ReportArg::Inventory => {
                    serde_json::to_string_pretty(&admin.reports.inventory(&filter).await?)?
                }
            };
            println!("{json}");
        }
    }

    Ok(())
}

fn list_filter(search: Option<String>, page: Option<u32>) -> ListFilter {
    ListFilter {
        search,
        page,
        ..ListFilter::default()
    }
}

async fn list(admin: &AdminClient, resource: Resource, filter: ListFilter) -> Result<()> {
    match resource {
        Resource::Categories => {
            admin.categories.fetch_all(&filter).await;
            print_record(admin.categories.snapshot(), |c| {
                format!("{:>6}  {}", c.id, c.name)
            })
        }
        Resource::Stores => {
            admin.stores.fetch_all(&filter).await;
            print_record(admin.stores.snapshot(), |s| {
                format!("{:>6}  {:<24} {}", s.id, s.name, s.location)
            })
        }
        Resource::Accounts => {
            admin
                .accounts
                .fetch_all(&stockroom_core::AccountFilter {
                    list: filter,
                    account_type: None,
                })
                .await;
            print_record(admin.accounts.snapshot(), |a| {
                format!("{:>6}  {:<9} {}", a.id, a.account_type, a.name)
            })
        }
        Resource::Products => {
            admin
                .products
                .fetch_all(&ProductFilter {
                    list: filter,
                    category_id: None,
                })
                .await;
            print_record(admin.products.snapshot(), |p| {
                format!("{:<12} {:<10} {:<28} {}", p.id, p.sku, p.name, p.price_sell)
            })
        }
        Resource::Quotations => {
            admin.quotations.fetch_all(&filter).await;
            print_record(admin.quotations.snapshot(), |q| {
                format!(
                    "{:<12} {:<9} {:<24} {:.2}",
                    q.quotation_number, q.status, q.customer_name, q.total
                )
            })
        }
        Resource::Purchases => {
            admin.purchases.fetch_all(&filter).await;
            print_record(admin.purchases.snapshot(), |p| {
                format!(
                    "{:<12} {:<9} {:<24} {:.2}",
                    p.purchase_number, p.status, p.supplier_name, p.total
                )
            })
        }
        Resource::StockMovements => {
            admin.stock_movements.fetch_all(&filter).await;
            print_record(admin.stock_movements.snapshot(), |m| {
                format!(
                    "{:>6}  {:<4} {:<28} {}",
                    m.id, m.movement_type, m.product_name, m.quantity
                )
            })
        }
    }
}

fn print_record<E>(record: EntityRecord<E>, row: impl Fn(&E) -> String) -> Result<()> {
    if let Some(error) = record.error {
        bail!(error);
    }

    for item in &record.items {
        println!("{}", row(item));
    }
    if let Some(page) = record.pagination {
        println!(
            "-- page {} of {}, {} total --",
            page.current_page, page.total_pages, page.total_items
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tracing::Level;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_filter_keeps_http_stack_quiet() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(DEFAULT_LOG_FILTER))
            .with_writer(std::io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "hyper::proto", Level::TRACE));
            assert!(!tracing::enabled!(target: "reqwest::connect", Level::DEBUG));
            assert!(tracing::enabled!(target: "hyper::proto", Level::INFO));
            assert!(tracing::enabled!(target: "stockroom_client::http", Level::DEBUG));
            assert!(!tracing::enabled!(target: "stockroom_client::http", Level::TRACE));
        });
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "stockroom-admin",
            "list",
            "stock-movements",
            "--search",
            "beras",
            "--page",
            "2",
        ])
        .unwrap();

        match cli.command {
            Command::List {
                resource: Resource::StockMovements,
                search,
                page,
            } => {
                let filter = list_filter(search, page);
                assert_eq!(filter.search.as_deref(), Some("beras"));
                assert_eq!(filter.page, Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
