//! Cache key composition
//!
//! Keys have the shape `{namespace}:{operation}:{fingerprint}`. Every key of
//! one entity type shares the namespace prefix, which is what makes wildcard
//! invalidation of the whole type possible.

use cq_domain::error::{Error, Result};

/// Separator between key segments
pub const KEY_SEPARATOR: char = ':';

/// Longest key accepted by every provider
pub const MAX_KEY_LEN: usize = 250;

/// Cache key utilities
pub struct CacheKey;

impl CacheKey {
    /// Compose a key from namespace, operation and argument fingerprint
    pub fn compose(namespace: &str, operation: &str, fingerprint: &str) -> String {
        Self::sanitize_key(&format!(
            "{namespace}{KEY_SEPARATOR}{operation}{KEY_SEPARATOR}{fingerprint}"
        ))
    }

    /// Pattern matching every key of a namespace
    pub fn namespace_pattern(namespace: &str) -> String {
        format!("{namespace}{KEY_SEPARATOR}*")
    }

    /// Validate a namespace: non-empty, no separator, no wildcard
    pub fn validate_namespace(namespace: &str) -> Result<()> {
        if namespace.is_empty() {
            return Err(Error::invalid_argument("Cache namespace cannot be empty"));
        }
        if namespace.contains(KEY_SEPARATOR) || namespace.contains('*') {
            return Err(Error::invalid_argument(format!(
                "Cache namespace {namespace:?} cannot contain ':' or '*'"
            )));
        }
        Ok(())
    }

    /// Sanitize a cache key by replacing control characters and wildcards
    pub fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_control() || c == '*' { '_' } else { c })
            .take(MAX_KEY_LEN)
            .collect()
    }
}
