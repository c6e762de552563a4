//! Listing providers.
//!
//! A provider yields the raw listings one site returns for a query. Live
//! scrapers live outside this workspace and plug in through
//! [`ListingProvider`].

use dealmatch_core::{Error, RawListing, Result};
use std::path::PathBuf;

/// Retrieval collaborator for one site.
pub trait ListingProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Fetch the raw listings for a query.
    fn fetch(&self, query: &str) -> Result<Vec<RawListing>>;
}

/// Provider that returns the same listings for every query.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    listings: Vec<RawListing>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, listings: Vec<RawListing>) -> Self {
        Self {
            name: name.into(),
            listings,
        }
    }
}

impl ListingProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, _query: &str) -> Result<Vec<RawListing>> {
        Ok(self.listings.clone())
    }
}

/// Replays captured listings from `<dir>/<slug>.json`, where the slug is the
/// lower-cased query with non-alphanumeric runs replaced by `_`.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    name: String,
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    /// Path of the capture file for a query.
    pub fn path_for(&self, query: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug(query)))
    }
}

impl ListingProvider for JsonFileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, query: &str) -> Result<Vec<RawListing>> {
        let path = self.path_for(query);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::provider(format!("{}: cannot read {}: {}", self.name, path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn slug(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut pending_sep = false;
    for c in query.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
