//! Configuration structures for the dealmatch system.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Source, Winner};

/// Main configuration for the comparison pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matching configuration.
    pub matching: MatchingConfig,
    /// Price parsing and formatting configuration.
    pub currency: CurrencyConfig,
    /// Display labels for the two sites.
    pub sources: SourceConfig,
    /// Retrieval configuration.
    pub search: SearchConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing sections fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.matching.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::config(format!(
                "matching.threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.currency.decimal_places > 8 {
            return Err(Error::config(format!(
                "currency.decimal_places must be at most 8, got {}",
                self.currency.decimal_places
            )));
        }
        if self.search.workers == 0 {
            return Err(Error::config("search.workers must be at least 1"));
        }
        Ok(())
    }
}

/// Matcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum Jaccard similarity (exclusive) for a pair to count as a match.
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self { threshold: 0.2 }
    }
}

/// Currency handling for price parsing and price-difference formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Glyph prefixed to formatted amounts.
    pub glyph: String,
    /// Thousands separator, both stripped on parse and inserted on format.
    pub thousands_separator: char,
    /// Decimal places in formatted amounts.
    pub decimal_places: usize,
    /// Price text that marks a listing as unavailable.
    pub unavailable_marker: String,
    /// Extra glyphs removed before parsing. Unicode currency symbols are
    /// always removed.
    pub strip_glyphs: Vec<char>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            glyph: "₹".to_string(),
            thousands_separator: ',',
            decimal_places: 2,
            unavailable_marker: "N/A".to_string(),
            strip_glyphs: Vec::new(),
        }
    }
}

/// Human-readable labels for sources and deal verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Display name of source A.
    pub source_a: String,
    /// Display name of source B.
    pub source_b: String,
    /// Verdict label when both prices are equal.
    pub tie: String,
}

impl SourceConfig {
    /// Display name for a source.
    pub fn label(&self, source: Source) -> &str {
        match source {
            Source::SourceA => &self.source_a,
            Source::SourceB => &self.source_b,
        }
    }

    /// Display label for a deal verdict.
    pub fn winner_label(&self, winner: Winner) -> &str {
        match winner {
            Winner::SourceA => &self.source_a,
            Winner::SourceB => &self.source_b,
            Winner::Tie => &self.tie,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_a: "Amazon".to_string(),
            source_b: "Flipkart".to_string(),
            tie: "Both have the same price".to_string(),
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Worker threads used to query the providers.
    pub workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { workers: 2 }
    }
}
