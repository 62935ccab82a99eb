//! Bank account number and routing code detection.

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// Bank account number matcher: 11 to 14 contiguous digits.
///
/// Ten digit runs belong to [`PhoneNumberMatcher`](super::PhoneNumberMatcher),
/// so the two categories never claim the same span.
#[derive(Debug, Clone)]
pub struct AccountNumberMatcher;

impl AccountNumberMatcher {
    pub fn new() -> Self {
        Self
    }

    fn text_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b\d{11,14}\b").expect("Valid account regex"));
        &PATTERN
    }

    fn token_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\d{11,14}$").expect("Valid account token regex"));
        &PATTERN
    }
}

impl Default for AccountNumberMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for AccountNumberMatcher {
    fn text_pattern(&self) -> &Regex {
        Self::text_regex()
    }

    fn token_pattern(&self) -> &Regex {
        Self::token_regex()
    }
}

/// Bank routing code matcher (IFSC layout): four uppercase letters followed
/// by seven digits, e.g. `SBIN0001234`.
#[derive(Debug, Clone)]
pub struct RoutingCodeMatcher;

impl RoutingCodeMatcher {
    pub fn new() -> Self {
        Self
    }

    fn text_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b[A-Z]{4}\d{7}\b").expect("Valid routing code regex"));
        &PATTERN
    }

    fn token_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[A-Z]{4}\d{7}$").expect("Valid routing code token regex")
        });
        &PATTERN
    }
}

impl Default for RoutingCodeMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for RoutingCodeMatcher {
    fn text_pattern(&self) -> &Regex {
        Self::text_regex()
    }

    fn token_pattern(&self) -> &Regex {
        Self::token_regex()
    }
}
