//! Survey Cache - graph-based caching with dependency-driven invalidation
//!
//! Caches arbitrary values by string key, tracks which keys were derived
//! from which other keys, and invalidates whole derivation subtrees in one
//! call:
//! - Per-entry TTL with eviction-driven graph cleanup
//! - Placeholder nodes for not-yet-set dependency keys
//! - Cycle-safe cascading invalidation
//!
//! # Example
//!
//! ```rust
//! use survey_cache::{CacheConfig, GraphCacheService};
//!
//! let cache = GraphCacheService::new(CacheConfig::default());
//! cache.set("list", vec![1, 2, 3], None, &[]);
//! cache.set("item:1", 1, None, &["list"]);
//!
//! cache.invalidate_node("list");
//! assert_eq!(cache.get::<i32>("item:1"), None);
//! ```

pub mod node;
pub mod service;

pub use node::CacheNode;
pub use service::{CacheConfig, CacheStatistics, GraphCacheService};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
