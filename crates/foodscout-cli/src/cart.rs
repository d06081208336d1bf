//! Cart command handlers for the CLI.
//!
//! The cart is loaded from `FOODSCOUT_CART_PATH` on every invocation and each
//! mutation is written back before the command returns.

use anyhow::Context;
use clap::Subcommand;
use foodscout_browse::fetch_by_barcode;
use foodscout_cart::{CartError, CartManager, FileStore};
use foodscout_core::AppConfig;

use crate::{browse, render};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines with quantities
    List,
    /// Look up a barcode and add one unit of it
    Add { code: String },
    /// Remove a whole line
    Remove { key: String },
    /// Set a line's quantity; 0 or less removes it
    Set {
        key: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit to a line
    Inc { key: String },
    /// Remove one unit from a line (refused at 1)
    Dec { key: String },
    /// Empty the cart
    Clear,
}

/// Run one cart sub-command.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved or the API client cannot be
/// built for `cart add`.
pub(crate) async fn run_cart(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    let mut cart = CartManager::load(FileStore::new(&config.cart_path));

    match command {
        CartCommands::List => {}
        CartCommands::Add { code } => {
            let client = browse::build_client(config)?;
            match fetch_by_barcode(&client, &code).await {
                Ok(product) => {
                    let key = cart.add_to_cart(product).context("failed to save cart")?;
                    println!("added {key}");
                }
                Err(e) => {
                    println!("{}", e.user_message());
                    return Ok(());
                }
            }
        }
        CartCommands::Remove { key } => {
            let removed = cart.remove_from_cart(&key).context("failed to save cart")?;
            if removed == 0 {
                println!("no cart line with key '{key}'");
                return Ok(());
            }
            println!("removed {key} ({removed} units)");
        }
        CartCommands::Set { key, quantity } => {
            if quantity > 0 && cart.quantity_of(&key) == 0 {
                println!("no cart line with key '{key}'");
                return Ok(());
            }
            match cart.update_quantity(&key, quantity) {
                Ok(()) => {}
                Err(CartError::QuantityTooLarge { max, .. }) => {
                    println!("quantity must be at most {max}");
                    return Ok(());
                }
                Err(e) => return Err(e).context("failed to update cart"),
            }
        }
        CartCommands::Inc { key } => report_step(cart.increment(&key), &key)?,
        CartCommands::Dec { key } => report_step(cart.decrement(&key), &key)?,
        CartCommands::Clear => {
            cart.clear_cart().context("failed to save cart")?;
            println!("cart cleared");
            return Ok(());
        }
    }

    render::print_cart(&cart.grouped_items());
    Ok(())
}

/// Turns user-level refusals into messages and keeps real failures as errors.
fn report_step(result: Result<usize, CartError>, key: &str) -> anyhow::Result<()> {
    match result {
        Ok(quantity) => {
            println!("{key}: quantity {quantity}");
            Ok(())
        }
        Err(CartError::UnknownKey { .. }) => {
            println!("no cart line with key '{key}'");
            Ok(())
        }
        Err(CartError::QuantityFloor { .. }) => {
            println!("{key} is at quantity 1; use `cart remove {key}` to drop it");
            Ok(())
        }
        Err(e) => Err(e).context("failed to update cart"),
    }
}
