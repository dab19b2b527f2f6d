//! Run-scoped exact-text deduplication.

use std::collections::HashSet;

/// Outcome of offering a text to [`UniqueContentSet::admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First time this text was seen; it has been recorded.
    Accepted,
    /// Text is empty or whitespace only.
    Empty,
    /// Exactly this text was already accepted in this run.
    Duplicate,
}

/// Every text accepted so far by one loader invocation.
///
/// Owned by the loader call that creates it; two runs never share one.
#[derive(Debug, Default)]
pub struct UniqueContentSet {
    seen: HashSet<String>,
}

impl UniqueContentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text` unless it is blank or already present.
    pub fn admit(&mut self, text: &str) -> Admission {
        if text.trim().is_empty() {
            return Admission::Empty;
        }

        if self.seen.contains(text) {
            return Admission::Duplicate;
        }

        self.seen.insert(text.to_string());
        Admission::Accepted
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_once() {
        let mut set = UniqueContentSet::new();
        assert_eq!(set.admit("page text"), Admission::Accepted);
        assert_eq!(set.admit("page text"), Admission::Duplicate);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_blank_is_empty() {
        let mut set = UniqueContentSet::new();
        assert_eq!(set.admit(""), Admission::Empty);
        assert_eq!(set.admit("  \n\t"), Admission::Empty);
        assert!(set.is_empty());
    }

    #[test]
    fn test_exact_equality_only() {
        let mut set = UniqueContentSet::new();
        assert_eq!(set.admit("Hello"), Admission::Accepted);
        assert_eq!(set.admit("hello"), Admission::Accepted);
        assert_eq!(set.admit("Hello "), Admission::Accepted);
        assert_eq!(set.len(), 3);
    }
}
