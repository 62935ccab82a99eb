//! Email address detection.

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// Email address pattern matcher.
///
/// The domain is one or more dot separated labels and the top level domain
/// has at least two letters, so `user@host` alone never matches.
#[derive(Debug, Clone)]
pub struct EmailMatcher;

impl EmailMatcher {
    pub fn new() -> Self {
        Self
    }

    fn text_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}\b")
                .expect("Valid email regex")
        });
        &PATTERN
    }

    fn token_regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
                .expect("Valid email token regex")
        });
        &PATTERN
    }
}

impl Default for EmailMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for EmailMatcher {
    fn text_pattern(&self) -> &Regex {
        Self::text_regex()
    }

    fn token_pattern(&self) -> &Regex {
        Self::token_regex()
    }
}
