//! Cross-site listing matching for the dealmatch system.
//!
//! This crate handles:
//! - Keyword-set (Jaccard) similarity between product names
//! - Price-difference formatting
//! - Greedy matching of source-A listings to source-B listings
//! - Deal resolution for each matched pair

pub mod similarity;
pub mod format;
pub mod matcher;

pub use similarity::{jaccard, name_similarity};
pub use format::{CurrencyFormat, PriceFormatter};
pub use matcher::{compare_raw, match_listings, MatchStats, Matcher};
