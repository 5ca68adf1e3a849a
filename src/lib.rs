//! Screener - Brazilian B3 asset screener
//!
//! Fetches quotes from brapi.dev, filters them by a price range or per-share
//! budget, and ranks the result by dividend yield or splits it into
//! cheapest / median / most expensive sections.

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod screening;
pub mod utils;
