//! Mosso CLI - cart, wishlist and catalog from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! mosso cart show
//!
//! # Add two units of product 3, then set it to one
//! mosso cart add 3 -q 2
//! mosso cart set 3 1
//!
//! # Toggle product 5 on the wishlist
//! mosso wishlist toggle 5
//!
//! # List Classic products
//! mosso catalog list --style classic
//! ```
//!
//! Each invocation is its own browsing context over the same storage file the
//! server uses, so a running server picks up the change on its next storage
//! poll.
//!
//! # Environment Variables
//!
//! - `MOSSO_DATA_DIR` - Directory holding `local-storage.json` (default: data)
//! - `MOSSO_CATALOG_PATH` - Product catalog JSON file (default: built-in catalog)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mosso_core::ProductId;

mod commands;

use commands::Workspace;

#[derive(Parser)]
#[command(name = "mosso")]
#[command(author, version, about = "Mosso CLI tools")]
struct Cli {
    /// Directory holding the storage file
    #[arg(long, env = "MOSSO_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Product catalog JSON file (built-in catalog when unset)
    #[arg(long, env = "MOSSO_CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect or change the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and subtotal
    Show,
    /// Add units of a product
    Add {
        /// Product id
        product_id: ProductId,

        /// Units to add; negative values decrement
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Set a product's quantity; zero or less removes it
    Set {
        /// Product id
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlisted products
    Show,
    /// Add or remove a product
    Toggle {
        /// Product id
        product_id: ProductId,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered by style
    List {
        /// Style filter (e.g. modern, avant-garde)
        #[arg(short, long)]
        style: Option<String>,

        /// Page number, 8 products per page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mosso_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    let workspace = Workspace::open(&cli.data_dir, cli.catalog.as_deref())?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&workspace, &mut out)?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&workspace, &mut out, product_id, quantity)?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&workspace, &mut out, product_id)?;
            }
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&workspace, &mut out, product_id, quantity)?,
            CartAction::Clear => commands::cart::clear(&workspace, &mut out)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&workspace, &mut out)?,
            WishlistAction::Toggle { product_id } => {
                commands::wishlist::toggle(&workspace, &mut out, product_id)?;
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { style, page } => {
                commands::catalog::list(&workspace, &mut out, style.as_deref(), page)?;
            }
        },
    }
    Ok(())
}
