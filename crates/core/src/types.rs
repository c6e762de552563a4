//! Core data types for the dealmatch system.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Normalized price with ordering support.
pub type Price = OrderedFloat<f64>;

/// Which site a listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    SourceA,
    SourceB,
}

impl Source {
    /// Stable identifier used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Source::SourceA => "source_a",
            Source::SourceB => "source_b",
        }
    }
}

/// A listing as handed over by a retrieval collaborator.
///
/// Every field is optional on the wire; [`Listing::from_raw`] decides which
/// omissions are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub name: Option<String>,
    pub price: Option<String>,
    pub seller: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
}

/// One scraped product entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Free-text title, used as the matching key.
    pub name: String,
    /// Currency-formatted price text. `None` means unavailable.
    pub price: Option<String>,
    /// Site the listing came from.
    pub source: Source,
    pub seller: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
}

impl Listing {
    /// Create a listing with only the fields used for matching.
    pub fn new(name: impl Into<String>, price: Option<&str>, source: Source) -> Self {
        Self {
            name: name.into(),
            price: price.map(str::to_string),
            source,
            seller: None,
            image_url: None,
            product_url: None,
        }
    }

    /// Validate a raw record into a listing.
    ///
    /// `index` is the record's position in its source collection and only
    /// appears in the error message.
    pub fn from_raw(raw: RawListing, source: Source, index: usize) -> Result<Self> {
        let name = raw.name.ok_or_else(|| {
            Error::malformed_input(format!(
                "{} listing #{} has no name",
                source.as_str(),
                index
            ))
        })?;

        Ok(Self {
            name,
            price: raw.price,
            source,
            seller: raw.seller,
            image_url: raw.image_url,
            product_url: raw.product_url,
        })
    }
}

/// Which side of a matched pair offers the lower price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    SourceA,
    SourceB,
    Tie,
}

impl Winner {
    /// Decide the winner from two finite normalized prices.
    pub fn from_prices(price_a: f64, price_b: f64) -> Self {
        if price_a < price_b {
            Winner::SourceA
        } else if price_a > price_b {
            Winner::SourceB
        } else {
            Winner::Tie
        }
    }
}

/// A source-A listing matched to a source-B listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub a_listing: Listing,
    pub b_listing: Listing,
    /// Formatted absolute price gap (e.g. "₹1,499.00").
    pub price_difference: String,
    pub winner: Winner,
    /// Display label for the winner.
    pub best_deal: String,
}

/// Everything one search request produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub source_a: Vec<Listing>,
    pub source_b: Vec<Listing>,
    pub comparisons: Vec<Comparison>,
}
