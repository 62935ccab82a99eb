//! Registry of named PII categories.
//!
//! The registry is built once at startup and then only read. Lookups are
//! forgiving about spelling ("Phone Numbers", "phone_number" and
//! "PhoneNumber" all resolve to the same category) because selections come
//! from users and configuration files.

use super::{BuiltinCategory, PatternMatcher};
use crate::error::{RedactorError, RedactorResult};
use regex::Regex;
use tracing::warn;

/// A named PII category with its text and token patterns.
#[derive(Debug, Clone)]
pub struct PiiCategory {
    name: String,
    aliases: Vec<String>,
    text_pattern: Regex,
    token_pattern: Regex,
}

impl PiiCategory {
    fn from_builtin(builtin: BuiltinCategory) -> Self {
        let matcher = builtin.matcher();
        Self {
            name: builtin.name().to_string(),
            aliases: builtin.aliases().iter().map(|a| a.to_string()).collect(),
            text_pattern: matcher.text_pattern().clone(),
            token_pattern: matcher.token_pattern().clone(),
        }
    }

    /// Builds a category from a single substring pattern. The token form is
    /// the same pattern anchored at both ends.
    pub fn custom(name: &str, pattern: &str) -> RedactorResult<Self> {
        if name.trim().is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "name".to_string(),
                reason: "Category name must not be empty".to_string(),
            });
        }

        let compile = |source: &str| {
            Regex::new(source).map_err(|e| RedactorError::PatternError {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        };

        let text_pattern = compile(pattern)?;
        if text_pattern.is_match("") {
            return Err(RedactorError::PatternError {
                pattern: pattern.to_string(),
                reason: "Pattern matches the empty string".to_string(),
            });
        }
        let token_pattern = compile(&format!("^(?:{})$", pattern))?;

        Ok(Self {
            name: name.trim().to_string(),
            aliases: Vec::new(),
            text_pattern,
            token_pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn answers_to(&self, key: &str) -> bool {
        lookup_key(&self.name) == key || self.aliases.iter().any(|a| lookup_key(a) == key)
    }
}

impl PatternMatcher for PiiCategory {
    fn text_pattern(&self) -> &Regex {
        &self.text_pattern
    }

    fn token_pattern(&self) -> &Regex {
        &self.token_pattern
    }
}

/// Category names chosen by the caller for one operation, in the order the
/// categories will be applied. An empty selection makes every operation a
/// pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionSelection {
    names: Vec<String>,
}

impl RedactionSelection {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::default();
        for name in names {
            selection.push(name);
        }
        selection
    }

    /// An empty selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// Selects every built-in category.
    pub fn all_builtin() -> Self {
        Self::new(BuiltinCategory::ALL.iter().map(|c| c.name()))
    }

    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RedactionSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Lookup table of PII categories.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    categories: Vec<PiiCategory>,
}

impl PatternRegistry {
    /// Registry holding only the built-in categories.
    pub fn builtin() -> Self {
        Self {
            categories: BuiltinCategory::ALL
                .iter()
                .map(|&c| PiiCategory::from_builtin(c))
                .collect(),
        }
    }

    /// Adds a custom category, replacing any category with the same name.
    pub fn register(&mut self, name: &str, pattern: &str) -> RedactorResult<()> {
        let category = PiiCategory::custom(name, pattern)?;
        let key = lookup_key(category.name());
        self.categories.retain(|c| lookup_key(c.name()) != key);
        self.categories.push(category);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> RedactorResult<&PiiCategory> {
        let key = lookup_key(name);
        self.categories
            .iter()
            .find(|c| c.answers_to(&key))
            .ok_or_else(|| RedactorError::UnknownCategory {
                name: name.to_string(),
            })
    }

    /// Resolves a selection into categories, in selection order.
    ///
    /// Unknown names are reported and skipped. Two names resolving to the
    /// same category yield it once.
    pub fn resolve(&self, selection: &RedactionSelection) -> Vec<&PiiCategory> {
        let mut resolved: Vec<&PiiCategory> = Vec::with_capacity(selection.len());
        for name in selection.iter() {
            match self.lookup(name) {
                Ok(category) => {
                    if !resolved.iter().any(|c| std::ptr::eq(*c, category)) {
                        resolved.push(category);
                    }
                }
                Err(err) => warn!(category = name, "{}; ignoring", err),
            }
        }
        resolved
    }

    /// Returns the first category whose text pattern matches `marker`.
    pub fn conflicting_category(&self, marker: &str) -> Option<&PiiCategory> {
        self.categories
            .iter()
            .find(|c| c.text_pattern.is_match(marker))
    }

    pub fn categories(&self) -> &[PiiCategory] {
        &self.categories
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
