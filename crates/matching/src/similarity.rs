//! Keyword-set similarity.

use dealmatch_ingestion::{keywords, KeywordSet};

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`; 0 when both sets are empty.
pub fn jaccard(a: &KeywordSet, b: &KeywordSet) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Jaccard similarity of two product names' keyword sets.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    jaccard(&keywords(a), &keywords(b))
}
