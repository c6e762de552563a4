//! Raw listings in, search results out.

use dealmatch_core::{Config, RawListing, Result, SearchResults, Source};
use dealmatch_ingestion::{ListingIntake, PriceNormalizer};
use dealmatch_matching::Matcher;
use tracing::debug;

/// Run intake and matching over both sources' raw listings.
///
/// Matching sees each source's deduplicated listings in retrieval order;
/// the listing collections in the result are then ordered by price.
pub fn build_results(
    raw_a: Vec<RawListing>,
    raw_b: Vec<RawListing>,
    config: &Config,
) -> Result<SearchResults> {
    let normalizer = PriceNormalizer::new(&config.currency);
    let mut intake_a = ListingIntake::new(Source::SourceA, normalizer.clone());
    let mut intake_b = ListingIntake::new(Source::SourceB, normalizer);

    let mut source_a = intake_a.ingest(raw_a)?;
    let mut source_b = intake_b.ingest(raw_b)?;
    debug!(a = ?intake_a.stats(), b = ?intake_b.stats(), "intake complete");

    let comparisons = Matcher::new(config).match_listings(&source_a, &source_b);

    intake_a.sort_by_price(&mut source_a);
    intake_b.sort_by_price(&mut source_b);

    Ok(SearchResults {
        source_a,
        source_b,
        comparisons,
    })
}
