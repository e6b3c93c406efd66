//! Parsed template cache.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::parser::{Format, ParsingErrors};

/// A parsed template together with the issues found while parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTemplate {
    format: Format,
    errors: ParsingErrors,
}

impl ParsedTemplate {
    pub(crate) fn new(format: Format, errors: ParsingErrors) -> Self {
        Self { format, errors }
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn errors(&self) -> &ParsingErrors {
        &self.errors
    }
}

/// Cache from template text to its parse result.
///
/// Entries are inserted once and shared as `Arc`s, so concurrent callers
/// never see a template change under them. With a capacity the least
/// recently used template is evicted first.
pub struct TemplateCache {
    entries: Mutex<LruCache<String, Arc<ParsedTemplate>>>,
}

impl TemplateCache {
    /// A cache holding at most `capacity` templates, or every template for
    /// `None` (or a zero capacity).
    pub fn new(capacity: Option<usize>) -> Self {
        let entries = match capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Returns the cached parse of `text`, parsing it with `parse` on a miss.
    pub(crate) fn get_or_parse(
        &self,
        text: &str,
        parse: impl FnOnce(&str) -> ParsedTemplate,
    ) -> Arc<ParsedTemplate> {
        if let Some(parsed) = self.entries.lock().get(text) {
            trace!(template = text, "template cache hit");
            return parsed.clone();
        }

        debug!(template = text, "template cache miss");
        let parsed = Arc::new(parse(text));
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(text) {
            return existing.clone();
        }
        entries.put(text.to_string(), parsed.clone());
        parsed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.lock().contains(text)
    }

    /// Drops every cached template.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(text: &str) -> ParsedTemplate {
        let (format, errors) = Parser::default().parse(text, &[]);
        ParsedTemplate::new(format, errors)
    }

    #[test]
    fn second_lookup_is_shared() {
        let cache = TemplateCache::default();
        let first = cache.get_or_parse("{0}", parse);
        let second = cache.get_or_parse("{0}", |_| panic!("should be cached"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache = TemplateCache::new(Some(2));
        cache.get_or_parse("a", parse);
        cache.get_or_parse("b", parse);
        cache.get_or_parse("a", parse);
        cache.get_or_parse("c", parse);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }
}
