//! Listing ingestion and normalization for the dealmatch system.
//!
//! This crate handles:
//! - Price text normalization
//! - Keyword extraction from product names
//! - Listing intake (validation, URL deduplication, price ordering)

pub mod price;
pub mod keywords;
pub mod intake;

pub use price::{normalize_price, PriceNormalizer};
pub use keywords::{keywords, KeywordSet};
pub use intake::{IntakeStats, ListingIntake};
