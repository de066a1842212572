//! Slug derivation
//!
//! A slug is the lowercase-kebab form of a store name, optionally followed by
//! a numeric disambiguation suffix: `blue-door`, `blue-door-2`, ...
//!
//! The storage-facing part (counting existing matches, retrying on a unique
//! index conflict) lives in the catalog crate; everything here is pure.

use regex::{Regex, RegexBuilder};

/// Normalize a display name into a base slug.
///
/// Non-ASCII letters are transliterated (`Café` -> `cafe`, `Müller` -> `muller`),
/// then the result is lowercased, every run of non-alphanumeric characters
/// becomes a single `-` and separators are trimmed from both ends. May
/// return an empty string.
pub fn slugify(name: &str) -> String {
    slug::slugify(name)
}

/// Pattern matching `base` and its suffixed variants: `^(base)(-[0-9]*)?$`,
/// case-insensitive.
pub fn suffix_pattern(base: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^({})(-[0-9]*)?$", regex::escape(base)))
        .case_insensitive(true)
        .build()
}

/// Count the slugs in `existing` that belong to `base`'s family
pub fn count_family<'a, I>(pattern: &Regex, existing: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter(|slug| pattern.is_match(slug))
        .count()
}

/// Slug for a store whose base already has `matches` family members:
/// `base` when there are none, `base-(N+1)` otherwise.
pub fn disambiguate(base: &str, matches: usize) -> String {
    if matches == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, matches + 1)
    }
}

/// Successive slug candidates starting from the observed family size.
///
/// The first item is [`disambiguate`]`(base, matches)`; each further item
/// bumps the suffix by one, for retrying after a unique-index conflict.
#[derive(Debug, Clone)]
pub struct SlugCandidates {
    base: String,
    next: usize,
}

impl SlugCandidates {
    pub fn new(base: impl Into<String>, matches: usize) -> Self {
        Self {
            base: base.into(),
            next: matches,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Iterator for SlugCandidates {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = disambiguate(&self.base, self.next);
        self.next += 1;
        Some(candidate)
    }
}
