//! The live document location.
//!
//! The page viewer assigns to it on navigation and the copy callback reads it
//! at copy time, so both hold a clone of the same `Location`.

use std::sync::{Arc, RwLock};

/// Shared, mutable URL of the page currently shown.
#[derive(Debug, Clone, Default)]
pub struct Location {
    href: Arc<RwLock<String>>,
}

impl Location {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Arc::new(RwLock::new(href.into())),
        }
    }

    /// Current URL.
    pub fn href(&self) -> String {
        match self.href.read() {
            Ok(href) => href.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Navigate to `href`.
    pub fn assign(&self, href: impl Into<String>) {
        let href = href.into();
        match self.href.write() {
            Ok(mut current) => *current = href,
            Err(poisoned) => *poisoned.into_inner() = href,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_assignments() {
        let location = Location::new("https://example.com/");
        let reader = location.clone();
        location.assign("https://example.com/about");
        assert_eq!(reader.href(), "https://example.com/about");
    }
}
