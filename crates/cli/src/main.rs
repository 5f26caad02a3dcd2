//! GoMarketplace CLI - Inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart show
//!
//! # Add one unit of a product
//! gm-cart add sku-1 --title "Mug" --image-url https://img/mug.png --price 12.00
//!
//! # Change quantities
//! gm-cart increment sku-1
//! gm-cart decrement sku-1
//!
//! # Delete the persisted cart
//! gm-cart clear
//! ```
//!
//! Configuration comes from the `CART_*` environment variables (see
//! `go_marketplace_cart::config`); `--storage-dir` overrides `CART_STORAGE_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use go_marketplace_cart::CartConfig;
use go_marketplace_core::{Price, Product, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cart contents and subtotal
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,

        /// Display name
        #[arg(short, long)]
        title: String,

        /// Display image reference
        #[arg(short, long)]
        image_url: String,

        /// Unit price
        #[arg(short, long)]
        price: Price,
    },
    /// Increase a line's quantity by one
    Increment {
        /// Product id
        id: String,
    },
    /// Decrease a line's quantity by one
    Decrement {
        /// Product id
        id: String,
    },
    /// Delete the persisted cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cart=info,gm_cart=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    match cli.command {
        Commands::Show => commands::cart::show(&config).await?,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            commands::cart::add(&config, Product::new(id, title, image_url, price)).await?;
        }
        Commands::Increment { id } => {
            commands::cart::increment(&config, ProductId::new(id)).await?;
        }
        Commands::Decrement { id } => {
            commands::cart::decrement(&config, ProductId::new(id)).await?;
        }
        Commands::Clear => commands::cart::clear(&config).await?,
    }
    Ok(())
}
