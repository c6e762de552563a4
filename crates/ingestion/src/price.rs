//! Price text normalization.
//!
//! Turns scraped, locale-formatted price strings into comparable numbers.
//! Anything that cannot be read as a price becomes `+inf`, so unavailable
//! listings sort last and never win a comparison.

use dealmatch_core::config::CurrencyConfig;
use dealmatch_core::{Listing, Price};
use lazy_static::lazy_static;
use ordered_float::OrderedFloat;
use regex::Regex;

lazy_static! {
    static ref DEFAULT_NORMALIZER: PriceNormalizer = PriceNormalizer::default();

    // Any Unicode currency symbol (₹, $, ₩, ฿, ...).
    static ref CURRENCY_SYMBOL_REGEX: Regex = Regex::new(r"\p{Sc}").unwrap();
}

/// Normalize a price with the default currency settings.
pub fn normalize_price(text: Option<&str>) -> f64 {
    DEFAULT_NORMALIZER.normalize(text)
}

/// Converts price text into a numeric value.
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    /// Text that marks a listing as unavailable.
    unavailable_marker: String,
    /// Thousands separator to drop.
    thousands_separator: char,
    /// Extra glyphs to drop besides currency symbols.
    strip_glyphs: Vec<char>,
}

impl PriceNormalizer {
    /// Create a normalizer from currency configuration.
    pub fn new(config: &CurrencyConfig) -> Self {
        Self {
            unavailable_marker: config.unavailable_marker.clone(),
            thousands_separator: config.thousands_separator,
            strip_glyphs: config.strip_glyphs.clone(),
        }
    }

    /// Parse price text. Returns `f64::INFINITY` for absent, unavailable or
    /// unparseable input.
    pub fn normalize(&self, text: Option<&str>) -> f64 {
        let text = match text {
            Some(t) if t != self.unavailable_marker => t,
            _ => return f64::INFINITY,
        };

        let cleaned: String = CURRENCY_SYMBOL_REGEX
            .replace_all(text, "")
            .chars()
            .filter(|c| !self.is_stripped(*c))
            .collect();

        match cleaned.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => f64::INFINITY,
        }
    }

    /// Whether `text` is the unavailable marker.
    pub fn is_unavailable_marker(&self, text: &str) -> bool {
        text == self.unavailable_marker
    }

    /// Normalized price of a listing.
    pub fn listing_price(&self, listing: &Listing) -> f64 {
        self.normalize(listing.price.as_deref())
    }

    /// Normalized price of a listing as an ordered sort key.
    pub fn sort_key(&self, listing: &Listing) -> Price {
        OrderedFloat(self.listing_price(listing))
    }

    fn is_stripped(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == self.thousands_separator || self.strip_glyphs.contains(&c)
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(&CurrencyConfig::default())
    }
}
