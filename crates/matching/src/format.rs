//! Price-difference formatting policy.
//!
//! The matcher does not know about currencies; it hands the absolute price
//! gap to a [`PriceFormatter`].

use dealmatch_core::config::CurrencyConfig;

/// Renders a numeric amount for display.
pub trait PriceFormatter {
    fn format(&self, amount: f64) -> String;
}

impl<F> PriceFormatter for F
where
    F: Fn(f64) -> String,
{
    fn format(&self, amount: f64) -> String {
        self(amount)
    }
}

/// Glyph-prefixed amount with grouped thousands, e.g. "₹1,499.00".
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormat {
    pub glyph: String,
    pub thousands_separator: char,
    pub decimal_places: usize,
}

impl CurrencyFormat {
    /// Create a format from currency configuration.
    pub fn new(config: &CurrencyConfig) -> Self {
        Self {
            glyph: config.glyph.clone(),
            thousands_separator: config.thousands_separator,
            decimal_places: config.decimal_places,
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new(&CurrencyConfig::default())
    }
}

impl PriceFormatter for CurrencyFormat {
    fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.decimal_places, amount.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut out = String::with_capacity(fixed.len() + self.glyph.len() + whole.len() / 3 + 1);
        out.push_str(&self.glyph);
        if amount.is_sign_negative() && amount != 0.0 {
            out.push('-');
        }
        out.push_str(&group_thousands(whole, self.thousands_separator));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
