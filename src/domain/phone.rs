//! Phone number domain logic.
//!
//! Numbers are ten digits long. They may carry a `+CC` country code and may
//! be grouped 3-3-4 with dashes, dots or single spaces. Digit runs longer
//! than ten never match, which keeps account numbers out of this category.

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ten digit phone number pattern matcher.
///
/// Supported formats:
/// - 9876543210
/// - 987-654-3210
/// - 987.654.3210
/// - +91 9876543210
/// - +1-987-654-3210
#[derive(Debug, Clone)]
pub struct PhoneNumberMatcher;

impl PhoneNumberMatcher {
    /// Creates a new phone number matcher.
    pub fn new() -> Self {
        Self
    }

    fn text_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?:\+\d{1,3}[ -]?|\b)\d{3}[-. ]?\d{3}[-. ]?\d{4}\b")
                .expect("Valid phone number regex")
        });
        &PATTERN
    }

    fn token_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(?:\+\d{1,3}-?)?\d{3}[-.]?\d{3}[-.]?\d{4}$")
                .expect("Valid phone number token regex")
        });
        &PATTERN
    }
}

impl Default for PhoneNumberMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for PhoneNumberMatcher {
    fn text_pattern(&self) -> &Regex {
        Self::text_regex()
    }

    fn token_pattern(&self) -> &Regex {
        Self::token_regex()
    }
}
