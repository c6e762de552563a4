//! Listing intake.
//!
//! Validates raw provider records, collapses duplicate product URLs and
//! orders listings by normalized price for display.

use dealmatch_core::{Listing, RawListing, Result, Source};
use std::collections::HashMap;
use tracing::debug;

use crate::price::PriceNormalizer;

/// Statistics about one source's intake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeStats {
    /// Raw records received.
    pub received: u64,
    /// Listings that passed validation.
    pub accepted: u64,
    /// Listings replaced by a later record with the same product URL.
    pub duplicates_dropped: u64,
    /// Listings kept after deduplication whose price normalizes to infinity.
    pub unpriced: u64,
}

/// Intake stage for one source's listings.
pub struct ListingIntake {
    source: Source,
    normalizer: PriceNormalizer,
    stats: IntakeStats,
}

impl ListingIntake {
    /// Create an intake stage for `source`.
    pub fn new(source: Source, normalizer: PriceNormalizer) -> Self {
        Self {
            source,
            normalizer,
            stats: IntakeStats::default(),
        }
    }

    /// Validate and deduplicate a batch of raw records, keeping input order.
    pub fn ingest(&mut self, raws: Vec<RawListing>) -> Result<Vec<Listing>> {
        let listings = self.validate(raws)?;
        let listings = self.dedup_by_url(listings);

        let unpriced = listings
            .iter()
            .filter(|l| self.normalizer.listing_price(l).is_infinite())
            .count();
        self.stats.unpriced += unpriced as u64;

        Ok(listings)
    }

    /// Convert raw records into listings. Fails on the first record without a name.
    pub fn validate(&mut self, raws: Vec<RawListing>) -> Result<Vec<Listing>> {
        self.stats.received += raws.len() as u64;

        let listings = raws
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Listing::from_raw(raw, self.source, index))
            .collect::<Result<Vec<_>>>()?;

        self.stats.accepted += listings.len() as u64;
        Ok(listings)
    }

    /// Collapse listings that share a product URL.
    ///
    /// The last record for a URL wins and takes the slot of the first one.
    /// Listings without a URL, with a blank one, or with the unavailable
    /// marker in its place are never merged.
    pub fn dedup_by_url(&mut self, listings: Vec<Listing>) -> Vec<Listing> {
        let mut slot_by_url: HashMap<String, usize> = HashMap::new();
        let mut result: Vec<Listing> = Vec::with_capacity(listings.len());
        let mut dropped = 0u64;

        for listing in listings {
            let key = self.dedup_key(&listing).map(str::to_string);

            match key.as_ref().and_then(|url| slot_by_url.get(url).copied()) {
                Some(i) => {
                    result[i] = listing;
                    dropped += 1;
                }
                None => {
                    if let Some(url) = key {
                        slot_by_url.insert(url, result.len());
                    }
                    result.push(listing);
                }
            }
        }

        self.stats.duplicates_dropped += dropped;

        debug!(
            source = self.source.as_str(),
            kept = result.len(),
            dropped,
            "deduplicated listings by product url"
        );

        result
    }

    /// Stable ascending sort by normalized price; unavailable prices last.
    pub fn sort_by_price(&self, listings: &mut [Listing]) {
        listings.sort_by_key(|l| self.normalizer.sort_key(l));
    }

    /// Get intake statistics.
    pub fn stats(&self) -> &IntakeStats {
        &self.stats
    }

    fn dedup_key<'a>(&self, listing: &'a Listing) -> Option<&'a str> {
        let url = listing.product_url.as_deref()?.trim();
        if url.is_empty() || self.normalizer.is_unavailable_marker(url) {
            None
        } else {
            Some(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealmatch_core::Error;

    fn raw(name: Option<&str>, price: Option<&str>, url: Option<&str>) -> RawListing {
        RawListing {
            name: name.map(str::to_string),
            price: price.map(str::to_string),
            product_url: url.map(str::to_string),
            ..Default::default()
        }
    }

    fn intake() -> ListingIntake {
        ListingIntake::new(Source::SourceA, PriceNormalizer::default())
    }

    #[test]
    fn test_ingest_counts() {
        let mut intake = intake();
        let listings = intake
            .ingest(vec![
                raw(Some("Pixel 8"), Some("₹59,999"), None),
                raw(Some("Pixel 8a"), Some("N/A"), None),
                raw(Some("Pixel 7"), None, None),
            ])
            .unwrap();

        assert_eq!(listings.len(), 3);
        assert!(listings.iter().all(|l| l.source == Source::SourceA));
        let stats = intake.stats();
        assert_eq!(stats.received, 3);
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.unpriced, 2);
    }

    #[test]
    fn test_unpriced_counted_after_dedup() {
        let mut intake = intake();
        intake
            .ingest(vec![
                raw(Some("Pixel 8"), Some("N/A"), Some("https://shop/p/8")),
                raw(Some("Pixel 8"), Some("₹59,999"), Some("https://shop/p/8")),
                raw(Some("Pixel 7"), None, Some("https://shop/p/7")),
            ])
            .unwrap();

        let stats = intake.stats();
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.duplicates_dropped, 1);
        assert_eq!(stats.unpriced, 1);
    }

    #[test]
    fn test_validate_does_not_count_unpriced() {
        let mut intake = intake();
        intake
            .validate(vec![raw(Some("Pixel 8a"), Some("N/A"), None)])
            .unwrap();
        assert_eq!(intake.stats().accepted, 1);
        assert_eq!(intake.stats().unpriced, 0);
    }

    #[test]
    fn test_validate_rejects_missing_name() {
        let mut intake = intake();
        let err = intake
            .validate(vec![
                raw(Some("Pixel 8"), Some("₹59,999"), None),
                raw(None, Some("₹1,000"), None),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_dedup_last_write_wins_in_first_slot() {
        let mut intake = intake();
        let listings = intake
            .ingest(vec![
                raw(Some("Old title"), Some("₹100"), Some("https://shop/p/1")),
                raw(Some("Other"), Some("₹200"), Some("https://shop/p/2")),
                raw(Some("New title"), Some("₹90"), Some("https://shop/p/1")),
            ])
            .unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "New title");
        assert_eq!(listings[0].price.as_deref(), Some("₹90"));
        assert_eq!(listings[1].name, "Other");
        assert_eq!(intake.stats().duplicates_dropped, 1);
    }

    #[test]
    fn test_dedup_keeps_listings_without_url() {
        let mut intake = intake();
        let listings = intake
            .ingest(vec![
                raw(Some("Same"), Some("₹100"), None),
                raw(Some("Same"), Some("₹100"), None),
            ])
            .unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(intake.stats().duplicates_dropped, 0);
    }

    #[test]
    fn test_dedup_ignores_placeholder_urls() {
        let mut intake = intake();
        let listings = intake
            .ingest(vec![
                raw(Some("Pixel 8"), Some("₹59,999"), Some("N/A")),
                raw(Some("Galaxy S24"), Some("₹64,999"), Some("N/A")),
                raw(Some("OnePlus 12"), Some("₹52,999"), Some("")),
                raw(Some("Nothing Phone 2"), Some("₹36,999"), Some("  ")),
            ])
            .unwrap();

        let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Pixel 8", "Galaxy S24", "OnePlus 12", "Nothing Phone 2"]
        );
        assert_eq!(intake.stats().duplicates_dropped, 0);
    }

    #[test]
    fn test_dedup_stats_accumulate_across_batches() {
        let mut intake = intake();
        for _ in 0..2 {
            let listings = intake
                .ingest(vec![
                    raw(Some("Pixel 8"), Some("₹59,999"), Some("https://shop/p/8")),
                    raw(Some("Pixel 8"), Some("₹58,999"), Some("https://shop/p/8")),
                ])
                .unwrap();
            assert_eq!(listings.len(), 1);
        }
        assert_eq!(intake.stats().duplicates_dropped, 2);
    }

    #[test]
    fn test_sort_by_price_is_stable_and_unavailable_last() {
        let intake = intake();
        let mut listings = vec![
            Listing::new("gone", Some("N/A"), Source::SourceA),
            Listing::new("pricey", Some("₹5,000"), Source::SourceA),
            Listing::new("cheap-1", Some("₹1,000"), Source::SourceA),
            Listing::new("missing", None, Source::SourceA),
            Listing::new("cheap-2", Some("₹1,000"), Source::SourceA),
        ];
        intake.sort_by_price(&mut listings);

        let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["cheap-1", "cheap-2", "pricey", "gone", "missing"]);
    }

    #[test]
    fn test_empty_batch() {
        let mut intake = intake();
        assert!(intake.ingest(Vec::new()).unwrap().is_empty());
        assert_eq!(intake.stats(), &IntakeStats::default());
    }
}
