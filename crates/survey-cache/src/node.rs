//! Nodes of the cache dependency graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One node in the cache dependency graph.
///
/// A node may exist as a placeholder, created only to record a dependency
/// edge, before its own value is ever set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheNode {
    /// The cache key for this node
    pub key: String,
    /// When this node was created
    pub created_at: DateTime<Utc>,
    /// When this node was last accessed
    pub last_accessed_at: DateTime<Utc>,
    /// Keys that must be invalidated when this key is invalidated
    pub dependents: HashSet<String>,
    /// Whether this node has been invalidated
    pub is_invalidated: bool,
}

impl CacheNode {
    /// Create a fresh node for `key`, stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            created_at: now,
            last_accessed_at: now,
            dependents: HashSet::new(),
            is_invalidated: false,
        }
    }

    /// Create a placeholder node whose only purpose is to carry an edge to
    /// `dependent`.
    #[must_use]
    pub fn placeholder(key: impl Into<String>, dependent: impl Into<String>) -> Self {
        let mut node = Self::new(key);
        node.dependents.insert(dependent.into());
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_carries_the_edge() {
        let node = CacheNode::placeholder("list", "item:1");
        assert_eq!(node.key, "list");
        assert!(node.dependents.contains("item:1"));
        assert!(!node.is_invalidated);
    }
}
