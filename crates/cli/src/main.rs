//! PneuShop CLI - Drive the shopper session from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Store the token issued by the backend login flow
//! pneushop token set eyJhbGciOi...
//!
//! # Find a tire and fill the cart
//! pneushop products --width 205 --height 55 --diameter 16
//! pneushop cart add 17 --quantity 4
//! pneushop cart show
//!
//! # Place the order (see `pneushop checkout --help`)
//! pneushop checkout --first-name Leila --last-name "Ben Salah" ...
//!
//! # Follow up
//! pneushop orders list
//! pneushop orders account
//! ```
//!
//! # Commands
//!
//! - `products` - Browse and search the catalog
//! - `cart` - Show and edit the cart
//! - `checkout` - Place an order for the cart
//! - `orders` - Inspect the order history and update statuses locally
//! - `token` - Store or forget the backend access token

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use pneushop_core::OrderStatus;

mod commands;

use commands::checkout::CheckoutArgs;
use commands::products::ProductsArgs;

#[derive(Parser)]
#[command(name = "pneushop")]
#[command(author, version, about = "PneuShop shopper session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse or search the catalog
    Products(Box<ProductsArgs>),
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the whole cart
    Checkout(Box<CheckoutArgs>),
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage the backend access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart and its totals
    Show,
    /// Add a product by id
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line quantity (0 or less removes it)
    Update {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List locally known orders
    List,
    /// Show one order
    Show { order_id: String },
    /// Update an order's status locally
    Status {
        order_id: String,

        /// `pending`, `confirmed`, `processing`, `shipped`, `delivered` or `cancelled`
        status: OrderStatus,
    },
    /// Backend orders merged with local-only ones
    Account,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store an access token
    Set { token: String },
    /// Forget the stored token
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pneushop_storefront=warn,pneushop=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Products(args) => commands::products::run(*args).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&product_id, quantity).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&product_id, quantity)?,
            CartAction::Remove { product_id } => commands::cart::remove(&product_id)?,
            CartAction::Clear => commands::cart::clear()?,
        },
        Commands::Checkout(args) => commands::checkout::run(*args).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list()?,
            OrdersAction::Show { order_id } => commands::orders::show(&order_id)?,
            OrdersAction::Status { order_id, status } => {
                commands::orders::set_status(&order_id, status)?;
            }
            OrdersAction::Account => commands::orders::account().await?,
        },
        Commands::Token { action } => match action {
            TokenAction::Set { token } => commands::token::set(token)?,
            TokenAction::Clear => commands::token::clear()?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;
    use pneushop_core::PaymentType;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_update() {
        let cli = Cli::try_parse_from(["pneushop", "cart", "update", "17", "-1"]).unwrap();
        let Commands::Cart {
            action: CartAction::Update { quantity, .. },
        } = cli.command
        else {
            panic!("expected cart update");
        };
        assert_eq!(quantity, -1);
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["pneushop", "orders", "status", "1042", "shipped"]).unwrap();
        let Commands::Orders {
            action: OrdersAction::Status { status, .. },
        } = cli.command
        else {
            panic!("expected orders status");
        };
        assert_eq!(status, OrderStatus::Shipped);

        assert!(Cli::try_parse_from(["pneushop", "orders", "status", "1042", "lost"]).is_err());
    }

    #[test]
    fn test_parse_checkout_defaults() {
        let cli = Cli::try_parse_from([
            "pneushop",
            "checkout",
            "--first-name",
            "Leila",
            "--last-name",
            "Ben Salah",
            "--address",
            "4 avenue Habib Bourguiba",
            "--city",
            "Sousse",
            "--postal-code",
            "4000",
            "--phone",
            "73222333",
        ])
        .unwrap();
        let Commands::Checkout(args) = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(args.country, "Tunisie");
        assert_eq!(args.payment, PaymentType::CashOnDelivery);
        assert!(args.warranty_client_name.is_none());
    }

    #[test]
    fn test_parse_products_filters() {
        let cli = Cli::try_parse_from([
            "pneushop",
            "products",
            "--search",
            "alpin",
            "--season",
            "hiver",
            "--diameter",
            "16",
            "--in-stock",
            "--max-price",
            "299.90",
        ])
        .unwrap();
        let Commands::Products(args) = cli.command else {
            panic!("expected products");
        };
        assert_eq!(args.search.as_deref(), Some("alpin"));
        assert_eq!(args.season, Some(pneushop_core::Season::Winter));
        assert_eq!(args.diameter, Some(16));
        assert!(args.in_stock);
        assert_eq!(args.max_price.unwrap().to_string(), "299.90");
        assert_eq!(args.page, 1);

        assert!(Cli::try_parse_from(["pneushop", "products", "--season", "printemps"]).is_err());
    }

    #[test]
    fn test_warranty_flags_go_together() {
        let result = Cli::try_parse_from([
            "pneushop",
            "checkout",
            "--first-name",
            "Leila",
            "--last-name",
            "Ben Salah",
            "--address",
            "4 avenue Habib Bourguiba",
            "--city",
            "Sousse",
            "--postal-code",
            "4000",
            "--phone",
            "73222333",
            "--warranty-client-name",
            "Leila Ben Salah",
        ]);
        assert!(result.is_err());
    }
}
