//! NaturPrime CLI - Browse the catalog, manage the cart and hand orders off.
//!
//! # Usage
//!
//! ```bash
//! # List protein products under ₺1.000, cheapest first
//! np-cli catalog --search protein --max-price 1000 --sort price-asc
//!
//! # Add two of product 3 to the cart
//! np-cli cart add 3 -q 2
//!
//! # Hand the cart to the merchant on WhatsApp
//! np-cli checkout --name "Ayse Yilmaz" --phone 05551112233 --address "Moda Cad. 1"
//! ```
//!
//! # Commands
//!
//! - `catalog` - Search, filter and sort products
//! - `product` - Show one product
//! - `cart` - Show, add, update, remove, clear
//! - `checkout` - Place an order from the cart
//! - `order` - Show or clear the last order

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use naturprime_core::{CatalogQuery, ChipFilter, CustomerDetails, MAX_QUANTITY, ProductId, SortMode};
use naturprime_storefront::config::TelemetryConfig;
use naturprime_storefront::{AppError, AppState, Result, StorefrontConfig, telemetry};
use rust_decimal::Decimal;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "np-cli")]
#[command(author, version, about = "NaturPrime storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter and sort the product catalog
    Catalog(CatalogArgs),
    /// Show one product
    Product {
        /// Product id
        id: ProductId,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Hand the cart off to the merchant as an order
    Checkout(CheckoutArgs),
    /// Show or forget the last placed order
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// Text matched against title and description, ignoring case
    #[arg(short, long, default_value = "")]
    search: String,

    /// Badge to filter by, or `all`
    #[arg(short, long, default_value = "all")]
    chip: String,

    /// Inclusive price ceiling
    #[arg(long)]
    max_price: Option<Decimal>,

    /// `popularity`, `new`, `bestseller`, `price-asc` or `price-desc`
    #[arg(long, default_value = "popularity")]
    sort: String,
}

impl CatalogArgs {
    fn query(&self) -> CatalogQuery {
        CatalogQuery::new()
            .with_search(self.search.as_str())
            .with_chip(ChipFilter::parse(&self.chip))
            .with_max_price(self.max_price)
            .with_sort(SortMode::parse(&self.sort))
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product from the feed
    Add {
        /// Product id
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_QUANTITY)))]
        quantity: u32,
    },
    /// Change a line's quantity by a signed amount
    Update {
        /// Product id
        id: ProductId,

        /// Amount to add, negative to subtract
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// Email address
    #[arg(long, default_value = "")]
    email: String,

    /// Province and district
    #[arg(long, default_value = "")]
    city: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Empty the cart once the order is handed off
    #[arg(long)]
    clear_cart: bool,
}

impl CheckoutArgs {
    fn customer(&self) -> CustomerDetails {
        CustomerDetails {
            full_name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            city: self.city.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Subcommand)]
enum OrderAction {
    /// Show the last placed order
    Show,
    /// Forget the last placed order
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _telemetry = telemetry::init(&TelemetryConfig::default());
            return fail(&AppError::from(e));
        }
    };

    // Keep the guard alive until exit so Sentry can flush
    let _telemetry = telemetry::init(&config.telemetry);

    match run(cli, config).await {
        Ok(output) => {
            if let Err(e) = std::io::stdout().lock().write_all(output.as_bytes()) {
                tracing::error!(error = %e, "Failed to write output");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn fail(err: &AppError) -> ExitCode {
    err.report();
    let _ = writeln!(std::io::stderr(), "np-cli: {}", err.user_message());
    ExitCode::from(err.exit_code())
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<String> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Catalog(args) => commands::catalog::list(&state, &args.query()).await,
        Commands::Product { id } => commands::catalog::show(&state, id).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity).await,
            CartAction::Update { id, delta } => commands::cart::update(&state, id, delta),
            CartAction::Remove { id } => commands::cart::remove(&state, id),
            CartAction::Clear => commands::cart::clear(&state),
        },
        Commands::Checkout(args) => {
            commands::checkout::place(&state, args.customer(), args.clear_cart)
        }
        Commands::Order { action } => match action {
            OrderAction::Show => commands::checkout::show_last(&state),
            OrderAction::Clear => commands::checkout::clear_last(&state),
        },
    }
}
