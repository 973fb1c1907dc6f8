//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! pneushop products --width 205 --height 55 --diameter 16 --season hiver
//! pneushop products --search "pilot sport" --in-stock
//! pneushop products --brand Michelin --max-price 300 --page 2
//! ```

use clap::Args;
use rust_decimal::Decimal;

use pneushop_core::Season;
use pneushop_storefront::backend::types::ProductFilters;

use super::{CliError, open_session, print_json};

/// Catalog browse and search options.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Search text; browses the catalog when omitted
    #[arg(short, long)]
    pub search: Option<String>,

    /// Catalog page, starting at 1 (ignored when searching)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// `ete`, `hiver` or `toutes-saisons`
    #[arg(long)]
    pub season: Option<Season>,

    /// Tread width in millimetres
    #[arg(long)]
    pub width: Option<u16>,

    /// Aspect ratio
    #[arg(long)]
    pub height: Option<u16>,

    /// Rim diameter in inches
    #[arg(long)]
    pub diameter: Option<u16>,

    /// Only products currently in stock
    #[arg(long)]
    pub in_stock: bool,

    #[arg(long)]
    pub min_price: Option<Decimal>,

    #[arg(long)]
    pub max_price: Option<Decimal>,
}

impl ProductsArgs {
    fn filters(&self) -> ProductFilters {
        ProductFilters {
            brand: self.brand.clone(),
            category: self.category.clone(),
            season: self.season,
            width: self.width,
            height: self.height,
            diameter: self.diameter,
            in_stock: self.in_stock.then_some(true),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// Print one catalog page.
pub async fn run(args: ProductsArgs) -> Result<(), CliError> {
    let session = open_session()?;
    let backend = session.backend();
    let filters = args.filters();

    let page = match args.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => backend.search_products(query, &filters).await?,
        None => backend.list_products(args.page, &filters).await?,
    };

    tracing::info!(shown = page.products.len(), total = page.count, "Catalog page");
    print_json(&page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ProductsArgs {
        ProductsArgs {
            search: None,
            page: 1,
            brand: None,
            category: None,
            season: None,
            width: None,
            height: None,
            diameter: None,
            in_stock: false,
            min_price: None,
            max_price: None,
        }
    }

    #[test]
    fn test_in_stock_flag_only_filters_when_set() {
        assert_eq!(args().filters(), ProductFilters::default());

        let filters = ProductsArgs {
            in_stock: true,
            width: Some(205),
            ..args()
        }
        .filters();
        assert_eq!(filters.in_stock, Some(true));
        assert_eq!(filters.width, Some(205));
    }
}
