//! Graph cache service over a TTL key/value store

use crate::node::CacheNode;
use chrono::Utc;
use moka::notification::RemovalCause;
use moka::sync::Cache;
use moka::Expiry;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default absolute expiration applied when `set` gives none.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Construction parameters for [`GraphCacheService`].
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Maximum number of entries the value store keeps
    pub max_capacity: u64,
    /// Expiration applied when `set` is called without one
    pub default_ttl: Duration,
}

impl CacheConfig {
    /// Create a config with the default capacity and TTL.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum entry count
    #[inline]
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set the default TTL
    #[inline]
    #[must_use]
    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl: DEFAULT_TTL,
        }
    }
}

/// Read-only snapshot of cache health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Nodes tracked in the dependency graph
    pub total_entries: usize,
    /// Nodes flagged as invalidated
    pub invalidated_entries: usize,
    /// Mean seconds since each node was last accessed
    pub average_seconds_since_access: f64,
}

/// Stored value plus the TTL it was set with.
#[derive(Clone)]
struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    ttl: Duration,
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry").field("ttl", &self.ttl).finish()
    }
}

/// Expiry policy reading the TTL each entry carries.
struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

type DependencyGraph = Arc<Mutex<HashMap<String, CacheNode>>>;

/// Cache keyed by string with dependency tracking and cascading
/// invalidation.
///
/// The value store expires entries on its own clock; its eviction listener
/// prunes the matching graph node so the graph never references an absent
/// entry. All graph mutations and last-access touches run under a single
/// exclusive lock; `invalidate_node` walks the cascade while holding it, so
/// invalidation costs O(descendant count).
#[derive(Debug, Clone)]
pub struct GraphCacheService {
    store: Cache<String, CacheEntry>,
    graph: DependencyGraph,
    default_ttl: Duration,
}

impl GraphCacheService {
    /// Create a service with its own value store built from `config`.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let graph: DependencyGraph = Arc::new(Mutex::new(HashMap::new()));

        let listener_graph = Arc::clone(&graph);
        let store = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(move |key: Arc<String>, _value, cause| {
                // Explicit removals and replacements maintain the graph
                // themselves; only store-initiated evictions prune here.
                if matches!(cause, RemovalCause::Expired | RemovalCause::Size) {
                    tracing::info!(key = %key, ?cause, "cache entry evicted");
                    listener_graph.lock().remove(key.as_str());
                }
            })
            .build();

        Self {
            store,
            graph,
            default_ttl: config.default_ttl,
        }
    }

    /// Store `value` under `key` with an absolute expiration relative to
    /// now (the configured default when `expiration` is `None`).
    ///
    /// Refreshes the node for `key`, keeping edges already recorded on it;
    /// edges accumulate and are pruned only by node removal. Each
    /// dependency key gains an edge back to `key`; a dependency not yet
    /// present gets a placeholder node.
    pub fn set<T>(&self, key: &str, value: T, expiration: Option<Duration>, dependencies: &[&str])
    where
        T: Any + Send + Sync,
    {
        let ttl = expiration.unwrap_or(self.default_ttl);
        self.store.insert(
            key.to_string(),
            CacheEntry {
                value: Arc::new(value),
                ttl,
            },
        );

        let mut graph = self.graph.lock();
        match graph.get_mut(key) {
            Some(node) => {
                let now = Utc::now();
                node.created_at = now;
                node.last_accessed_at = now;
                node.is_invalidated = false;
            }
            None => {
                graph.insert(key.to_string(), CacheNode::new(key));
            }
        }

        for dependency in dependencies {
            match graph.get_mut(*dependency) {
                Some(node) => {
                    node.dependents.insert(key.to_string());
                }
                None => {
                    graph.insert(
                        (*dependency).to_string(),
                        CacheNode::placeholder(*dependency, key),
                    );
                }
            }
        }
        drop(graph);

        tracing::info!(
            key = %key,
            dependency_count = dependencies.len(),
            "cache entry added"
        );
    }

    /// Fetch the value stored under `key`, if present and unexpired.
    ///
    /// Touches the node's last-access time whenever the node exists, even
    /// when the value itself is already gone.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
    {
        {
            let mut graph = self.graph.lock();
            if let Some(node) = graph.get_mut(key) {
                node.last_accessed_at = Utc::now();
            }
        }

        self.store
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned())
    }

    /// Same semantics as [`get`](Self::get); kept from the store contract,
    /// where the existence signal was separate. `Option` already carries it.
    #[must_use]
    pub fn try_get_value<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone + Send + Sync,
    {
        self.get(key)
    }

    /// Whether the store currently holds a live value for `key`.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Invalidate `key` and every entry that transitively depends on it.
    ///
    /// Computes the descendant set against a point-in-time snapshot of the
    /// graph and flags every affected node while holding the graph lock;
    /// cost is O(descendant count). The walk is guarded by a visited set,
    /// so a graph that momentarily contains a cycle still terminates.
    pub fn invalidate_node(&self, key: &str) {
        let affected = {
            let mut graph = self.graph.lock();
            let mut affected = collect_descendants(&graph, key);
            if !affected.iter().any(|k| k == key) {
                affected.push(key.to_string());
            }
            for k in &affected {
                if let Some(node) = graph.get_mut(k) {
                    node.is_invalidated = true;
                }
            }
            affected
        };

        // The store may run the eviction listener on this thread, so its
        // removals happen outside the graph lock.
        for k in &affected {
            self.store.invalidate(k);
            tracing::info!(key = %k, "invalidated cache entry");
        }

        tracing::info!(
            key = %key,
            count = affected.len(),
            "invalidated cache entries"
        );
    }

    /// Remove a single key's value and graph node without touching its
    /// dependents. Use when a key's absence should not propagate.
    pub fn remove(&self, key: &str) {
        self.store.invalidate(key);
        self.graph.lock().remove(key);
        tracing::info!(key = %key, "removed cache entry");
    }

    /// Remove every tracked key's value and clear the graph.
    pub fn clear(&self) {
        let keys: Vec<String> = {
            let mut graph = self.graph.lock();
            let keys = graph.keys().cloned().collect();
            graph.clear();
            keys
        };

        for key in &keys {
            self.store.invalidate(key);
        }
        tracing::info!("cleared all cache entries");
    }

    /// Snapshot of graph health.
    ///
    /// Runs the store's pending maintenance first so entries past their TTL
    /// are already pruned from the graph when the snapshot is taken.
    #[must_use]
    pub fn statistics(&self) -> CacheStatistics {
        self.store.run_pending_tasks();

        let graph = self.graph.lock();
        let total_entries = graph.len();
        let invalidated_entries = graph.values().filter(|n| n.is_invalidated).count();

        let average_seconds_since_access = if total_entries > 0 {
            let now = Utc::now();
            let total_seconds: f64 = graph
                .values()
                .map(|n| {
                    (now - n.last_accessed_at).num_milliseconds().max(0) as f64 / 1000.0
                })
                .sum();
            total_seconds / total_entries as f64
        } else {
            0.0
        };

        CacheStatistics {
            total_entries,
            invalidated_entries,
            average_seconds_since_access,
        }
    }
}

impl Default for GraphCacheService {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Transitive closure over `dependents`, excluding revisits.
fn collect_descendants(graph: &HashMap<String, CacheNode>, key: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut to_visit: VecDeque<String> = VecDeque::new();

    if let Some(node) = graph.get(key) {
        to_visit.extend(node.dependents.iter().cloned());
    }

    while let Some(current) = to_visit.pop_front() {
        if seen.insert(current.clone()) {
            if let Some(node) = graph.get(&current) {
                to_visit.extend(node.dependents.iter().cloned());
            }
        }
    }

    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let cache = GraphCacheService::default();
        cache.set("answer:1", "pending".to_string(), None, &[]);

        assert_eq!(
            cache.get::<String>("answer:1"),
            Some("pending".to_string())
        );
        assert!(cache.contains("answer:1"));
    }

    #[test]
    fn get_with_wrong_type_is_absent() {
        let cache = GraphCacheService::default();
        cache.set("count", 42_u32, None, &[]);

        assert_eq!(cache.get::<String>("count"), None);
        assert_eq!(cache.get::<u32>("count"), Some(42));
    }

    #[test]
    fn missing_key_is_absent() {
        let cache = GraphCacheService::default();
        assert_eq!(cache.get::<String>("nothing"), None);
        assert_eq!(cache.try_get_value::<String>("nothing"), None);
    }

    #[test]
    fn dependency_on_unset_key_creates_placeholder() {
        let cache = GraphCacheService::default();
        cache.set("item:1", 1_u32, None, &["list"]);

        // the placeholder node counts even though "list" has no value
        assert!(!cache.contains("list"));
        assert_eq!(cache.statistics().total_entries, 2);

        cache.invalidate_node("list");
        assert_eq!(cache.get::<u32>("item:1"), None);
    }

    #[test]
    fn remove_does_not_cascade() {
        let cache = GraphCacheService::default();
        cache.set("list", 0_u32, None, &[]);
        cache.set("item:1", 1_u32, None, &["list"]);

        cache.remove("list");

        assert_eq!(cache.get::<u32>("list"), None);
        assert_eq!(cache.get::<u32>("item:1"), Some(1));
    }

    #[test]
    fn clear_empties_store_and_graph() {
        let cache = GraphCacheService::default();
        cache.set("a", 1_u32, None, &[]);
        cache.set("b", 2_u32, None, &["a"]);

        cache.clear();

        assert_eq!(cache.get::<u32>("a"), None);
        assert_eq!(cache.get::<u32>("b"), None);
        assert_eq!(cache.statistics().total_entries, 0);
    }

    #[test]
    fn statistics_count_invalidated_nodes() {
        let cache = GraphCacheService::default();
        cache.set("a", 1_u32, None, &[]);
        cache.set("b", 2_u32, None, &["a"]);

        cache.invalidate_node("a");

        let stats = cache.statistics();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.invalidated_entries, 2);
        assert!(stats.average_seconds_since_access >= 0.0);
    }

    #[test]
    fn overwrite_keeps_recorded_dependents() {
        let cache = GraphCacheService::default();
        cache.set("list", 1_u32, None, &[]);
        cache.set("item:1", 1_u32, None, &["list"]);

        // a later overwrite of "list" must not orphan item:1's edge
        cache.set("list", 2_u32, None, &[]);
        cache.invalidate_node("list");

        assert_eq!(cache.get::<u32>("item:1"), None);
    }

    #[test]
    fn statistics_on_empty_cache() {
        let cache = GraphCacheService::default();
        let stats = cache.statistics();
        assert_eq!(stats, CacheStatistics::default());
    }
}
