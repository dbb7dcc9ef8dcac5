//! Serendib CLI - terminal chat client and local cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Chat with the travel guide through a running storefront
//! serendib chat --endpoint http://localhost:5000
//!
//! # Manage a cart stored on disk
//! serendib cart add 1 --quantity 2
//! serendib cart show
//!
//! # List products
//! serendib catalog --category tea
//!
//! # Check the storefront and bot service
//! serendib health
//! ```
//!
//! # Environment Variables
//!
//! - `SERENDIB_ENDPOINT` - Storefront base URL (default: `http://localhost:5000/`)
//! - `SERENDIB_STORAGE_DIR` - Cart directory (default: data/carts)
//! - `SERENDIB_CATALOG` - Catalog JSON file (default: built-in catalog)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serendib_core::{ProductId, SessionId};
use serendib_storefront::load_catalog;
use url::Url;

mod commands;

use commands::cart::CartAction;

#[derive(Parser)]
#[command(name = "serendib")]
#[command(author, version, about = "Serendib storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot through a running storefront
    Chat {
        /// Storefront base URL
        #[arg(long, env = "SERENDIB_ENDPOINT", default_value = "http://localhost:5000/")]
        endpoint: Url,

        /// Session id to continue (default: a new random id)
        #[arg(long, value_parser = parse_session_id)]
        session: Option<SessionId>,

        /// Send a single message and exit
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Manage a cart stored on disk
    Cart {
        /// Directory holding cart files
        #[arg(long, env = "SERENDIB_STORAGE_DIR", default_value = "data/carts")]
        storage_dir: PathBuf,

        /// Cart key (file name without extension)
        #[arg(long, default_value = "local", value_parser = parse_session_id)]
        key: SessionId,

        /// Catalog JSON file
        #[arg(long, env = "SERENDIB_CATALOG")]
        catalog: Option<PathBuf>,

        #[command(subcommand)]
        action: CartCommand,
    },
    /// List products
    Catalog {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Catalog JSON file
        #[arg(long, env = "SERENDIB_CATALOG")]
        catalog: Option<PathBuf>,
    },
    /// Check storefront and bot service health
    Health {
        /// Storefront base URL
        #[arg(long, env = "SERENDIB_ENDPOINT", default_value = "http://localhost:5000/")]
        endpoint: Url,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show cart contents
    Show,
    /// Change a product's quantity by a signed amount
    Add {
        product_id: u32,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set a product's quantity (0 removes it)
    Set { product_id: u32, quantity: u32 },
    /// Remove a product
    Remove { product_id: u32 },
    /// Empty the cart
    Clear,
}

impl From<CartCommand> for CartAction {
    fn from(command: CartCommand) -> Self {
        match command {
            CartCommand::Show => Self::Show,
            CartCommand::Add {
                product_id,
                quantity,
            } => Self::Add {
                product_id: ProductId::new(product_id),
                delta: quantity,
            },
            CartCommand::Set {
                product_id,
                quantity,
            } => Self::Set {
                product_id: ProductId::new(product_id),
                quantity,
            },
            CartCommand::Remove { product_id } => Self::Remove {
                product_id: ProductId::new(product_id),
            },
            CartCommand::Clear => Self::Clear,
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, String> {
    SessionId::parse(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "serendib=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Chat {
            endpoint,
            session,
            message,
        } => commands::chat::run(&endpoint, session, message).await?,
        Commands::Cart {
            storage_dir,
            key,
            catalog,
            action,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            commands::cart::run(catalog, &storage_dir, &key, action.into())?;
        }
        Commands::Catalog { category, catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            commands::catalog::list(&catalog, category.as_deref());
        }
        Commands::Health { endpoint } => commands::health::check(&endpoint).await?,
    }
    Ok(())
}
