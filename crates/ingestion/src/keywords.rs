//! Keyword extraction from product names.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // Maximal runs of Unicode letters, digits and underscore. Other connector
    // punctuation and combining marks separate words.
    static ref WORD_REGEX: Regex = Regex::new(r"[\p{L}\p{N}_]+").unwrap();
}

/// Unordered set of lower-cased name tokens.
pub type KeywordSet = HashSet<String>;

/// Extract the keyword set of a product name.
pub fn keywords(name: &str) -> KeywordSet {
    let lowered = name.to_lowercase();
    WORD_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
