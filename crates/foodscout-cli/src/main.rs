mod browse;
mod cart;
mod render;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use foodscout_core::{Category, SortOption};
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;

#[derive(Debug, Parser)]
#[command(name = "foodscout")]
#[command(about = "Browse Open Food Facts and keep a shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the default product feed
    Browse {
        /// Number of pages to fetch (stops early on a short page)
        #[arg(long, default_value = "1")]
        pages: u32,
        /// Category key to filter by (e.g. beverages)
        #[arg(long)]
        category: Option<Category>,
        /// Sort key: name-asc, name-desc, grade-asc, grade-desc
        #[arg(long)]
        sort: Option<SortOption>,
    },
    /// Search products by name
    Search {
        name: String,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        sort: Option<SortOption>,
    },
    /// Look up a barcode and show the product if it exists
    Barcode { code: String },
    /// Show product details
    Show {
        code: String,
        /// Add the product to the cart after showing it
        #[arg(long)]
        add: bool,
    },
    /// List categories known to the database, or the products in one
    Categories {
        /// Category facet to list products for (e.g. beverages)
        key: Option<String>,
        /// Page of the category listing to show, with a key
        #[arg(long, default_value = "1")]
        page: u32,
        /// Maximum number of categories to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = foodscout_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Browse {
            pages,
            category,
            sort,
        } => {
            let client = browse::build_client(&config)?;
            browse::run_browse(&client, &config, pages, browse::filter_state(category, sort))
                .await;
        }
        Commands::Search {
            name,
            category,
            sort,
        } => {
            let client = browse::build_client(&config)?;
            browse::run_search(&client, &config, &name, browse::filter_state(category, sort))
                .await;
        }
        Commands::Barcode { code } => {
            let client = browse::build_client(&config)?;
            browse::run_barcode(&client, &config, &code).await;
        }
        Commands::Show { code, add } => {
            let client = browse::build_client(&config)?;
            browse::run_show(&client, &config, &code, add).await?;
        }
        Commands::Categories { key, page, limit } => {
            let client = browse::build_client(&config)?;
            match key {
                Some(key) => browse::run_category_products(&client, &key, page).await,
                None => browse::run_categories(&client, limit).await,
            }
        }
        Commands::Cart { command } => {
            cart::run_cart(&config, command).await?;
        }
        Commands::Config => render::print_config(&config),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
