//! Domain models and business logic for PII pattern matching.
//!
//! Every category carries two patterns: a substring form used on continuous
//! text and an anchored whole-token form used on words segmented by OCR.
//! A partial match inside an OCR token is almost always a fragment, so the
//! token form never matches anywhere but start-to-end.

pub mod account;
pub mod email;
pub mod national_id;
pub mod phone;
pub mod registry;
pub mod token;

pub use account::{AccountNumberMatcher, RoutingCodeMatcher};
pub use email::EmailMatcher;
pub use national_id::NationalIdMatcher;
pub use phone::PhoneNumberMatcher;
pub use registry::{PatternRegistry, PiiCategory, RedactionSelection};
pub use token::{BoundingBox, PositionedToken};

use regex::Regex;

/// Trait for PII pattern matching strategies.
pub trait PatternMatcher: Send + Sync {
    /// Pattern matched anywhere inside continuous text.
    fn text_pattern(&self) -> &Regex;

    /// Pattern that must cover a whole OCR token.
    fn token_pattern(&self) -> &Regex;

    fn extract_all<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.text_pattern()
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }

    fn matches_token(&self, token: &str) -> bool {
        let cleaned = normalize_token(token);
        !cleaned.is_empty() && self.token_pattern().is_match(cleaned)
    }
}

/// The categories that ship with the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCategory {
    Email,
    PhoneNumber,
    AccountNumber,
    RoutingCode,
    NationalId,
}

impl BuiltinCategory {
    pub const ALL: [BuiltinCategory; 5] = [
        Self::Email,
        Self::PhoneNumber,
        Self::AccountNumber,
        Self::RoutingCode,
        Self::NationalId,
    ];

    /// Canonical category name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::PhoneNumber => "PhoneNumber",
            Self::AccountNumber => "AccountNumber",
            Self::RoutingCode => "RoutingCode",
            Self::NationalId => "NationalId",
        }
    }

    /// Alternative names accepted on lookup, including the labels shown by
    /// the upload form this tool replaces.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Email => &["Emails", "Email Address"],
            Self::PhoneNumber => &["Phone Numbers", "Phone"],
            Self::AccountNumber => &["Account Numbers", "Account"],
            Self::RoutingCode => &["IFSC Codes", "IFSC", "Routing"],
            Self::NationalId => &["PAN", "TaxId", "Tax ID"],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Email => "local-part@domain.tld",
            Self::PhoneNumber => "10 digits, optional +CC prefix and 3-3-4 separators",
            Self::AccountNumber => "11 to 14 contiguous digits",
            Self::RoutingCode => "4 letters followed by 7 digits",
            Self::NationalId => "5 letters, 4 digits, 1 letter",
        }
    }

    pub fn matcher(self) -> Box<dyn PatternMatcher> {
        match self {
            Self::Email => Box::new(EmailMatcher::new()),
            Self::PhoneNumber => Box::new(PhoneNumberMatcher::new()),
            Self::AccountNumber => Box::new(AccountNumberMatcher::new()),
            Self::RoutingCode => Box::new(RoutingCodeMatcher::new()),
            Self::NationalId => Box::new(NationalIdMatcher::new()),
        }
    }
}

/// Strips whitespace and the punctuation OCR tends to glue onto words
/// ("(jane@x.com)," reads as one token).
pub fn normalize_token(token: &str) -> &str {
    token
        .trim()
        .trim_start_matches(['(', '[', '{', '<', '"', '\''])
        .trim_end_matches([',', ';', ':', '!', '?', ')', ']', '}', '>', '"', '\'', '.'])
}
