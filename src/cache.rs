//! Compiled expression cache.

use std::sync::Arc;

use dashmap::DashMap;
use log::trace;

use crate::xpath::{ParseError, XPath};

/// Concurrent map from expression text to its compiled form.
///
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: DashMap<String, Arc<XPath>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached expression for `text`, compiling and inserting it on a miss.
    ///
    /// Failed compilations are not cached. When two threads miss at once
    /// both compile, but only the first insert wins and both get that entry.
    pub fn get_or_compile(&self, text: &str) -> Result<Arc<XPath>, ParseError> {
        if let Some(entry) = self.entries.get(text) {
            trace!("expression cache hit for {}", text);
            return Ok(Arc::clone(entry.value()));
        }

        trace!("expression cache miss for {}", text);
        let compiled = Arc::new(XPath::compile(text)?);
        let entry = self
            .entries
            .entry(text.to_string())
            .or_insert(compiled);
        Ok(Arc::clone(entry.value()))
    }

    /// Number of cached expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached expression.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_instance() {
        let cache = ExpressionCache::new();
        let first = cache.get_or_compile("//name").unwrap();
        let second = cache.get_or_compile("//name").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = ExpressionCache::new();
        assert!(cache.get_or_compile("//[").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ExpressionCache::new();
        cache.get_or_compile("/a").unwrap();
        cache.get_or_compile("/b").unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_callers_share_one_entry() {
        let cache = Arc::new(ExpressionCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_compile("/a/b[1]").unwrap())
            })
            .collect();
        let results: Vec<Arc<XPath>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.len(), 1);
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }
    }
}
