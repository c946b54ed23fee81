//! Origin allow-list

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Origin of the published browser extension, always allowed
pub const DEFAULT_EXTENSION_ORIGIN: &str = "chrome-extension://pcmbkfodbdjnfeeeiinlmnmgdijbbjlf";

static EXTENSION_ORIGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^chrome-extension://[a-z]{32}$").expect("extension origin pattern is valid")
});

/// Set of caller origins permitted to use non-health routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginAllowList {
    origins: BTreeSet<String>,
}

impl Default for OriginAllowList {
    fn default() -> Self {
        Self::from_configured(std::iter::empty::<&str>())
    }
}

impl OriginAllowList {
    /// Build the list from configured entries plus the built-in default
    ///
    /// Entries that are not a well-formed extension origin are dropped.
    pub fn from_configured<I, S>(configured: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = BTreeSet::new();
        origins.insert(DEFAULT_EXTENSION_ORIGIN.to_string());

        for entry in configured {
            let entry = entry.as_ref().trim().trim_end_matches('/');
            if Self::is_well_formed(entry) {
                origins.insert(entry.to_string());
            } else if !entry.is_empty() {
                tracing::warn!(origin = %entry, "ignoring malformed allowed origin");
            }
        }

        Self { origins }
    }

    /// Whether `origin` matches the extension origin pattern
    pub fn is_well_formed(origin: &str) -> bool {
        EXTENSION_ORIGIN.is_match(origin)
    }

    /// Whether `origin` may call protected routes
    pub fn allows(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }
}
