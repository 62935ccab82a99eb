//! National tax identifier detection (PAN layout: `ABCDE1234F`).

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct NationalIdMatcher;

impl NationalIdMatcher {
    pub fn new() -> Self {
        Self
    }

    fn text_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b[A-Z]{5}\d{4}[A-Z]\b").expect("Valid national id regex")
        });
        &PATTERN
    }

    fn token_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[A-Z]{5}\d{4}[A-Z]$").expect("Valid national id token regex")
        });
        &PATTERN
    }
}

impl Default for NationalIdMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for NationalIdMatcher {
    fn text_pattern(&self) -> &Regex {
        Self::text_regex()
    }

    fn token_pattern(&self) -> &Regex {
        Self::token_regex()
    }
}
