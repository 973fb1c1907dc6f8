//! Product snapshots as fetched from the backend catalog.
//!
//! The storefront never mutates a product; it trusts the last snapshot it
//! fetched and uses `stock` as the ceiling for orderable quantities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::round_currency;
use super::status::ParseStatusError;

/// A tire product as seen by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    /// Commercial model or size designation.
    #[serde(default)]
    pub model: String,
    /// Unit price.
    pub price: Decimal,
    /// Previous price, shown struck through when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    /// Units available; the upper bound for any cart quantity.
    pub stock: u32,
    /// Availability flag published by the backend.
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<TireSpecifications>,
}

impl Product {
    /// Whether the product can be added to a cart at all.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.in_stock && self.stock > 0
    }

    /// Discount relative to the previous price, as a whole-number percentage.
    ///
    /// Returns `None` when there is no previous price or it is not higher
    /// than the current one.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<Decimal> {
        let old = self.old_price?;
        if old <= self.price || old.is_zero() {
            return None;
        }
        let pct = (old - self.price) / old * Decimal::ONE_HUNDRED;
        Some(pct.round())
    }

    /// Specification text frozen into order lines (e.g. `225/45 R17 91W`).
    ///
    /// Falls back to the model designation when no tire dimensions are known.
    #[must_use]
    pub fn specification_label(&self) -> String {
        self.specifications
            .as_ref()
            .map_or_else(|| self.model.clone(), TireSpecifications::label)
    }

    /// Unit price rounded for display and transmission.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        round_currency(self.price)
    }
}

/// Tire dimensions and ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TireSpecifications {
    /// Section width in millimetres (e.g. 225).
    pub width: u16,
    /// Aspect ratio (e.g. 45).
    pub height: u16,
    /// Rim diameter in inches (e.g. 17).
    pub diameter: u16,
    pub load_index: u16,
    pub speed_rating: String,
    pub season: Season,
}

impl TireSpecifications {
    /// Standard sidewall notation.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}/{} R{} {}{}",
            self.width, self.height, self.diameter, self.load_index, self.speed_rating
        )
    }
}

/// Tire season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Season {
    #[default]
    #[serde(rename = "ete")]
    Summer,
    #[serde(rename = "hiver")]
    Winter,
    #[serde(rename = "toutes-saisons")]
    AllSeason,
}

impl Season {
    /// Catalog name used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "ete",
            Self::Winter => "hiver",
            Self::AllSeason => "toutes-saisons",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ete" => Ok(Self::Summer),
            "hiver" => Ok(Self::Winter),
            "toutes-saisons" => Ok(Self::AllSeason),
            _ => Err(ParseStatusError::new("season", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("P1"),
            name: "Primacy 4".to_string(),
            brand: "Michelin".to_string(),
            model: "225/45R17".to_string(),
            price: Decimal::from(300),
            old_price: Some(Decimal::from(400)),
            stock: 4,
            in_stock: true,
            specifications: Some(TireSpecifications {
                width: 225,
                height: 45,
                diameter: 17,
                load_index: 91,
                speed_rating: "W".to_string(),
                season: Season::Summer,
            }),
        }
    }

    #[test]
    fn test_specification_label() {
        assert_eq!(product().specification_label(), "225/45 R17 91W");
    }

    #[test]
    fn test_specification_label_falls_back_to_model() {
        let mut p = product();
        p.specifications = None;
        assert_eq!(p.specification_label(), "225/45R17");
    }

    #[test]
    fn test_discount_percentage() {
        assert_eq!(product().discount_percentage(), Some(Decimal::from(25)));

        let mut p = product();
        p.old_price = Some(Decimal::from_str("250").unwrap());
        assert_eq!(p.discount_percentage(), None);
    }

    #[test]
    fn test_is_available_requires_stock() {
        let mut p = product();
        assert!(p.is_available());
        p.stock = 0;
        assert!(!p.is_available());
    }

    #[test]
    fn test_season_serde_names() {
        assert_eq!(
            serde_json::to_string(&Season::AllSeason).unwrap(),
            "\"toutes-saisons\""
        );
    }

    #[test]
    fn test_season_parses_catalog_names() {
        for season in [Season::Summer, Season::Winter, Season::AllSeason] {
            assert_eq!(season.as_str().parse::<Season>().unwrap(), season);
            assert_eq!(
                serde_json::to_string(&season).unwrap(),
                format!("\"{season}\"")
            );
        }
        assert!("printemps".parse::<Season>().is_err());
    }
}
