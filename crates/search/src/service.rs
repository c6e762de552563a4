//! Search service.
//!
//! Queries both providers concurrently, then runs the pipeline once both
//! have returned. A provider failure degrades to an empty collection.

use dealmatch_core::{Config, Error, RawListing, Result, SearchResults, Source};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::pipeline::build_results;
use crate::provider::ListingProvider;

/// Runs searches against a pair of providers.
pub struct SearchService {
    config: Config,
    provider_a: Box<dyn ListingProvider>,
    provider_b: Box<dyn ListingProvider>,
    pool: ThreadPool,
}

impl SearchService {
    /// Create a service. Fails on invalid configuration.
    pub fn new(
        config: Config,
        provider_a: Box<dyn ListingProvider>,
        provider_b: Box<dyn ListingProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.search.workers)
            .thread_name(|i| format!("dealmatch-search-{i}"))
            .build()
            .map_err(|e| Error::config(format!("cannot build search pool: {e}")))?;

        Ok(Self {
            config,
            provider_a,
            provider_b,
            pool,
        })
    }

    /// Search both sites for `query` and compare the results.
    pub fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_query("A product name is required"));
        }

        let (raw_a, raw_b) = self.pool.join(
            || fetch_or_empty(self.provider_a.as_ref(), Source::SourceA, query),
            || fetch_or_empty(self.provider_b.as_ref(), Source::SourceB, query),
        );

        let results = build_results(raw_a, raw_b, &self.config)?;
        info!(
            query,
            source_a = results.source_a.len(),
            source_b = results.source_b.len(),
            comparisons = results.comparisons.len(),
            "search complete"
        );
        Ok(results)
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn fetch_or_empty(provider: &dyn ListingProvider, source: Source, query: &str) -> Vec<RawListing> {
    match provider.fetch(query) {
        Ok(listings) => {
            info!(
                provider = provider.name(),
                source = source.as_str(),
                count = listings.len(),
                "fetched listings"
            );
            listings
        }
        Err(e) => {
            warn!(
                provider = provider.name(),
                source = source.as_str(),
                error = %e,
                "provider failed, continuing with no listings"
            );
            Vec::new()
        }
    }
}
