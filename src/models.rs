use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScreenerError;

/// Asset types the screener distinguishes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetType {
    Stock, // Brazilian stocks (ações)
    Fii,   // Real estate investment funds
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "STOCK",
            AssetType::Fii => "FII",
        }
    }

    /// Label as shown on B3 listings
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Stock => "Ação",
            AssetType::Fii => "FII",
        }
    }

    /// Classify from the ticker: FIIs end in 11, everything else is a stock
    pub fn from_ticker(ticker: &str) -> Self {
        if ticker.trim().ends_with("11") {
            AssetType::Fii
        } else {
            AssetType::Stock
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ticker and last traded price, as returned by the bulk quote list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub ticker: String,
    pub price: Decimal,
}

impl AssetSummary {
    pub fn new(ticker: impl Into<String>, price: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            price,
        }
    }
}

/// Enriched asset with dividend yield and logo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub ticker: String,
    pub price: Decimal,
    pub dividend_yield: Decimal,
    pub asset_type: AssetType,
    /// Logo URL, empty when unknown
    pub logo: String,
}

impl Asset {
    /// Build an asset; the type is derived from the ticker
    pub fn new(
        ticker: impl Into<String>,
        price: Decimal,
        dividend_yield: Decimal,
        logo: impl Into<String>,
    ) -> Self {
        let ticker = ticker.into();
        let asset_type = AssetType::from_ticker(&ticker);
        Self {
            ticker,
            price,
            dividend_yield,
            asset_type,
            logo: logo.into(),
        }
    }

    pub fn has_logo(&self) -> bool {
        !self.logo.is_empty()
    }
}

/// Anything carrying a price the filters can look at
pub trait Priced {
    fn price(&self) -> Decimal;
}

impl Priced for AssetSummary {
    fn price(&self) -> Decimal {
        self.price
    }
}

impl Priced for Asset {
    fn price(&self) -> Decimal {
        self.price
    }
}

/// Inclusive price band; `min <= max` is guaranteed by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, ScreenerError> {
        if min > max {
            return Err(ScreenerError::Validation(format!(
                "minimum price ({}) cannot be greater than maximum price ({})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Price constraint chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PriceWindow {
    /// Both bounds inclusive
    Range(PriceRange),
    /// Maximum investment per share (`price <= max`)
    Budget { max: Decimal },
}

impl PriceWindow {
    pub fn range(min: Decimal, max: Decimal) -> Result<Self, ScreenerError> {
        PriceRange::new(min, max).map(PriceWindow::Range)
    }

    pub fn budget(max: Decimal) -> Result<Self, ScreenerError> {
        let window = PriceWindow::Budget { max };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), ScreenerError> {
        match self {
            PriceWindow::Range(range) => PriceRange::new(range.min, range.max).map(|_| ()),
            PriceWindow::Budget { max } if *max <= Decimal::ZERO => Err(
                ScreenerError::Validation(format!("budget must be a positive amount, got {}", max)),
            ),
            PriceWindow::Budget { .. } => Ok(()),
        }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        match self {
            PriceWindow::Range(range) => range.contains(price),
            PriceWindow::Budget { max } => price <= *max,
        }
    }

    pub fn upper(&self) -> Decimal {
        match self {
            PriceWindow::Range(range) => range.max,
            PriceWindow::Budget { max } => *max,
        }
    }

    pub fn lower(&self) -> Option<Decimal> {
        match self {
            PriceWindow::Range(range) => Some(range.min),
            PriceWindow::Budget { .. } => None,
        }
    }
}

/// Titled group of assets for sectioned output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSection {
    pub title: String,
    pub assets: Vec<Asset>,
}
