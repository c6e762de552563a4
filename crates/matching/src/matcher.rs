//! Greedy cross-site matcher and deal resolver.
//!
//! Each source-A listing, in input order, claims the most similar source-B
//! listing still available. A claim needs similarity strictly above the
//! threshold and finite prices on both sides. Claimed listings never return
//! to the pool, so a later A listing cannot take back an earlier claim even
//! when it would be the better match.

use dealmatch_core::config::SourceConfig;
use dealmatch_core::{Comparison, Config, Listing, RawListing, Result, Source, Winner};
use dealmatch_ingestion::{keywords, KeywordSet, PriceNormalizer};
use tracing::{debug, info};

use crate::format::{CurrencyFormat, PriceFormatter};
use crate::similarity::jaccard;

/// Statistics about one matching run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Source-A listings considered.
    pub candidates: u64,
    /// Comparisons emitted.
    pub matched: u64,
    /// A listings whose best candidate did not clear the threshold.
    pub below_threshold: u64,
    /// A listings with a good candidate but a non-finite price on either side.
    pub unpriced: u64,
}

/// Matches source-A listings against source-B listings.
pub struct Matcher<F = CurrencyFormat> {
    /// Similarity a pair must exceed.
    threshold: f64,
    normalizer: PriceNormalizer,
    formatter: F,
    labels: SourceConfig,
}

impl Matcher<CurrencyFormat> {
    /// Create a matcher that formats differences per the currency configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_formatter(config, CurrencyFormat::new(&config.currency))
    }
}

impl<F: PriceFormatter> Matcher<F> {
    /// Create a matcher with a custom price-difference formatter.
    pub fn with_formatter(config: &Config, formatter: F) -> Self {
        Self {
            threshold: config.matching.threshold,
            normalizer: PriceNormalizer::new(&config.currency),
            formatter,
            labels: config.sources.clone(),
        }
    }

    /// Similarity threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Match two listing collections.
    pub fn match_listings(&self, list_a: &[Listing], list_b: &[Listing]) -> Vec<Comparison> {
        self.match_with_stats(list_a, list_b).0
    }

    /// Match two listing collections and report how each A listing fared.
    pub fn match_with_stats(
        &self,
        list_a: &[Listing],
        list_b: &[Listing],
    ) -> (Vec<Comparison>, MatchStats) {
        let mut stats = MatchStats::default();
        let mut comparisons = Vec::new();

        let b_keywords: Vec<KeywordSet> = list_b.iter().map(|b| keywords(&b.name)).collect();
        let mut available = vec![true; list_b.len()];

        for a in list_a {
            stats.candidates += 1;
            let a_keywords = keywords(&a.name);

            let Some((index, similarity)) = best_candidate(&a_keywords, &b_keywords, &available)
                .filter(|&(_, similarity)| similarity > self.threshold)
            else {
                stats.below_threshold += 1;
                continue;
            };

            let b = &list_b[index];
            let price_a = self.normalizer.listing_price(a);
            let price_b = self.normalizer.listing_price(b);
            if !price_a.is_finite() || !price_b.is_finite() {
                debug!(a = %a.name, b = %b.name, similarity, "matched pair lacks a price, skipping");
                stats.unpriced += 1;
                continue;
            }

            let winner = Winner::from_prices(price_a, price_b);
            debug!(a = %a.name, b = %b.name, similarity, ?winner, "matched listings");

            comparisons.push(Comparison {
                a_listing: a.clone(),
                b_listing: b.clone(),
                price_difference: self.formatter.format((price_a - price_b).abs()),
                winner,
                best_deal: self.labels.winner_label(winner).to_string(),
            });
            available[index] = false;
            stats.matched += 1;
        }

        info!(
            source_a = list_a.len(),
            source_b = list_b.len(),
            matched = stats.matched,
            below_threshold = stats.below_threshold,
            unpriced = stats.unpriced,
            "matching complete"
        );

        (comparisons, stats)
    }

    /// Validate raw records from both sources, then match them.
    pub fn compare_raw(
        &self,
        raw_a: Vec<RawListing>,
        raw_b: Vec<RawListing>,
    ) -> Result<Vec<Comparison>> {
        let list_a = into_listings(raw_a, Source::SourceA)?;
        let list_b = into_listings(raw_b, Source::SourceB)?;
        Ok(self.match_listings(&list_a, &list_b))
    }
}

/// Best available candidate as `(index, similarity)`.
///
/// Only strictly greater similarity replaces the current best, so the first
/// candidate wins ties. Candidates with zero similarity are never returned.
fn best_candidate(
    a_keywords: &KeywordSet,
    b_keywords: &[KeywordSet],
    available: &[bool],
) -> Option<(usize, f64)> {
    let mut best = None;
    let mut highest = 0.0;

    for (index, b) in b_keywords.iter().enumerate() {
        if !available[index] {
            continue;
        }
        let similarity = jaccard(a_keywords, b);
        if similarity > highest {
            highest = similarity;
            best = Some((index, similarity));
        }
    }

    best
}

fn into_listings(raws: Vec<RawListing>, source: Source) -> Result<Vec<Listing>> {
    raws.into_iter()
        .enumerate()
        .map(|(index, raw)| Listing::from_raw(raw, source, index))
        .collect()
}

/// Match with the default configuration.
pub fn match_listings(list_a: &[Listing], list_b: &[Listing]) -> Vec<Comparison> {
    Matcher::new(&Config::default()).match_listings(list_a, list_b)
}

/// Validate and match raw records with the given configuration.
pub fn compare_raw(
    raw_a: Vec<RawListing>,
    raw_b: Vec<RawListing>,
    config: &Config,
) -> Result<Vec<Comparison>> {
    Matcher::new(config).compare_raw(raw_a, raw_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealmatch_core::Error;
    use std::collections::HashSet;

    fn a(name: &str, price: &str) -> Listing {
        Listing::new(name, Some(price), Source::SourceA)
    }

    fn b(name: &str, price: &str) -> Listing {
        Listing::new(name, Some(price), Source::SourceB)
    }

    #[test]
    fn test_iphone_scenario() {
        let list_a = vec![a("iPhone 15 128GB", "₹79,999")];
        let list_b = vec![b("Apple iPhone 15 (128GB)", "₹78,500")];

        let comparisons = match_listings(&list_a, &list_b);

        assert_eq!(comparisons.len(), 1);
        let c = &comparisons[0];
        assert_eq!(c.winner, Winner::SourceB);
        assert_eq!(c.price_difference, "₹1,499.00");
        assert_eq!(c.best_deal, "Flipkart");
        assert_eq!(c.a_listing, list_a[0]);
        assert_eq!(c.b_listing, list_b[0]);
    }

    #[test]
    fn test_unrelated_products_do_not_match() {
        let list_a = vec![a("Samsung TV", "₹50,000")];
        let list_b = vec![b("Kitchen Blender", "₹2,000")];
        assert!(match_listings(&list_a, &list_b).is_empty());
    }

    #[test]
    fn test_unavailable_price_skips_pair() {
        let list_a = vec![a("iPhone 15 128GB", "N/A")];
        let list_b = vec![b("Apple iPhone 15 (128GB)", "₹78,500")];
        assert!(match_listings(&list_a, &list_b).is_empty());

        let list_a = vec![a("iPhone 15 128GB", "₹79,999")];
        let list_b = vec![Listing::new("Apple iPhone 15 (128GB)", None, Source::SourceB)];
        assert!(match_listings(&list_a, &list_b).is_empty());
    }

    #[test]
    fn test_unpriced_skip_leaves_candidate_in_pool() {
        let list_a = vec![
            a("iPhone 15 128GB", "N/A"),
            a("iPhone 15 128GB Blue", "₹77,000"),
        ];
        let list_b = vec![b("Apple iPhone 15 (128GB)", "₹78,500")];

        let (comparisons, stats) = Matcher::new(&Config::default()).match_with_stats(&list_a, &list_b);

        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].a_listing.name, "iPhone 15 128GB Blue");
        assert_eq!(comparisons[0].winner, Winner::SourceA);
        assert_eq!(comparisons[0].best_deal, "Amazon");
        assert_eq!(stats.unpriced, 1);
        assert_eq!(stats.matched, 1);
    }

    #[test]
    fn test_tie() {
        let list_a = vec![a("Boat Airdopes 141", "₹1,299")];
        let list_b = vec![b("boAt Airdopes 141 TWS", "₹1,299")];

        let comparisons = match_listings(&list_a, &list_b);

        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].winner, Winner::Tie);
        assert_eq!(comparisons[0].price_difference, "₹0.00");
        assert_eq!(comparisons[0].best_deal, "Both have the same price");
    }

    #[test]
    fn test_empty_inputs() {
        let list = vec![a("iPhone 15", "₹79,999")];
        assert!(match_listings(&[], &list).is_empty());
        assert!(match_listings(&list, &[]).is_empty());
        assert!(match_listings(&[], &[]).is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // {p, q, r} vs {p, s, t}: 1 / 5 = 0.2
        let list_a = vec![a("p q r", "₹10")];
        let list_b = vec![b("p s t", "₹20")];
        assert!(match_listings(&list_a, &list_b).is_empty());

        // {p, q, r} vs {p, s}: 1 / 4 = 0.25
        let list_b = vec![b("p s", "₹20")];
        assert_eq!(match_listings(&list_a, &list_b).len(), 1);
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let list_a = vec![a("boat earbuds", "₹999"), a("boat earbuds", "₹999")];
        let list_b = vec![
            b("boat earbuds black", "₹1,099"),
            b("boat earbuds white", "₹899"),
        ];

        let comparisons = match_listings(&list_a, &list_b);

        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].b_listing.name, "boat earbuds black");
        assert_eq!(comparisons[0].winner, Winner::SourceA);
        assert_eq!(comparisons[1].b_listing.name, "boat earbuds white");
        assert_eq!(comparisons[1].winner, Winner::SourceB);
    }

    #[test]
    fn test_earlier_claim_is_not_stolen_back() {
        let list_a = vec![
            a("Samsung Galaxy S24 Ultra case", "₹499"),
            a("Samsung Galaxy S24 Ultra", "₹1,29,999"),
        ];
        let list_b = vec![b("Samsung Galaxy S24 Ultra", "₹1,24,999")];

        let comparisons = match_listings(&list_a, &list_b);

        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].a_listing.name, "Samsung Galaxy S24 Ultra case");
        assert_eq!(comparisons[0].price_difference, "₹124,500.00");
    }

    #[test]
    fn test_output_follows_a_order_and_is_injective() {
        let list_a = vec![
            a("Redmi Note 13 Pro 5G", "₹25,999"),
            a("Garden hose 15m", "₹799"),
            a("Redmi Note 13 5G", "₹17,999"),
            a("OnePlus Nord CE 4", "₹24,999"),
            a("Redmi Note 13 Pro", "₹24,999"),
        ];
        let list_b = vec![
            b("Xiaomi Redmi Note 13 5G", "₹16,999"),
            b("OnePlus Nord CE4 5G", "₹24,499"),
            b("Redmi Note 13 Pro 5G (8GB)", "₹26,499"),
        ];

        let comparisons = match_listings(&list_a, &list_b);

        assert!(comparisons.len() <= list_a.len().min(list_b.len()));
        let claimed: HashSet<&str> = comparisons.iter().map(|c| c.b_listing.name.as_str()).collect();
        assert_eq!(claimed.len(), comparisons.len());

        let order: Vec<usize> = comparisons
            .iter()
            .map(|c| list_a.iter().position(|l| *l == c.a_listing).unwrap())
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_custom_threshold_and_formatter() {
        let mut config = Config::default();
        config.matching.threshold = 0.8;
        let matcher = Matcher::with_formatter(&config, |amount: f64| format!("{amount:.0} INR"));

        let list_a = vec![a("iPhone 15 128GB", "₹79,999")];
        let list_b = vec![b("Apple iPhone 15 (128GB)", "₹78,500")];
        assert!(matcher.match_listings(&list_a, &list_b).is_empty());

        config.matching.threshold = 0.5;
        let matcher = Matcher::with_formatter(&config, |amount: f64| format!("{amount:.0} INR"));
        let comparisons = matcher.match_listings(&list_a, &list_b);
        assert_eq!(comparisons[0].price_difference, "1499 INR");
    }

    #[test]
    fn test_compare_raw_rejects_missing_name() {
        let raw_a = vec![RawListing {
            name: Some("iPhone 15".to_string()),
            price: Some("₹79,999".to_string()),
            ..Default::default()
        }];
        let raw_b = vec![RawListing {
            price: Some("₹78,500".to_string()),
            ..Default::default()
        }];

        let err = compare_raw(raw_a, raw_b, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_compare_raw_missing_price_is_unavailable() {
        let raw_a = vec![RawListing {
            name: Some("iPhone 15".to_string()),
            ..Default::default()
        }];
        let raw_b = vec![RawListing {
            name: Some("iPhone 15".to_string()),
            price: Some("₹78,500".to_string()),
            ..Default::default()
        }];

        let comparisons = compare_raw(raw_a, raw_b, &Config::default()).unwrap();
        assert!(comparisons.is_empty());
    }
}
