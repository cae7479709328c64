//! Cascading invalidation and eviction behavior

use std::time::Duration;
use survey_cache::{CacheConfig, GraphCacheService};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn invalidation_cascades_through_the_chain() {
    init_tracing();
    // C depends on B depends on A
    let cache = GraphCacheService::default();
    cache.set("a", 1_u32, None, &[]);
    cache.set("b", 2_u32, None, &["a"]);
    cache.set("c", 3_u32, None, &["b"]);

    cache.invalidate_node("a");

    assert_eq!(cache.get::<u32>("a"), None);
    assert_eq!(cache.get::<u32>("b"), None);
    assert_eq!(cache.get::<u32>("c"), None);
    assert_eq!(cache.statistics().invalidated_entries, 3);
}

#[test]
fn invalidating_mid_chain_leaves_the_root_intact() {
    let cache = GraphCacheService::default();
    cache.set("a", 1_u32, None, &[]);
    cache.set("b", 2_u32, None, &["a"]);
    cache.set("c", 3_u32, None, &["b"]);

    cache.invalidate_node("b");

    assert_eq!(cache.get::<u32>("a"), Some(1));
    assert_eq!(cache.get::<u32>("b"), None);
    assert_eq!(cache.get::<u32>("c"), None);
}

#[test]
fn cyclic_graph_invalidation_terminates() {
    // A depends on B, B depends on A
    let cache = GraphCacheService::default();
    cache.set("a", 1_u32, None, &[]);
    cache.set("b", 2_u32, None, &["a"]);
    cache.set("a", 1_u32, None, &["b"]);

    cache.invalidate_node("a");
    assert_eq!(cache.get::<u32>("a"), None);
    assert_eq!(cache.get::<u32>("b"), None);

    cache.set("a", 3_u32, None, &[]);
    cache.set("b", 4_u32, None, &[]);
    cache.invalidate_node("b");
    assert_eq!(cache.get::<u32>("a"), None);
    assert_eq!(cache.get::<u32>("b"), None);
}

#[test]
fn expired_entry_disappears_from_statistics() {
    init_tracing();
    let cache = GraphCacheService::new(CacheConfig::new().with_default_ttl(Duration::from_millis(50)));
    cache.set("short-lived", 1_u32, None, &[]);
    assert_eq!(cache.statistics().total_entries, 1);

    std::thread::sleep(Duration::from_millis(150));

    assert_eq!(cache.get::<u32>("short-lived"), None);
    assert_eq!(cache.statistics().total_entries, 0);
}

#[test]
fn per_call_expiration_overrides_the_default() {
    let cache = GraphCacheService::default();
    cache.set("blink", 1_u32, Some(Duration::from_millis(50)), &[]);
    cache.set("stay", 2_u32, None, &[]);

    std::thread::sleep(Duration::from_millis(150));

    assert_eq!(cache.get::<u32>("blink"), None);
    assert_eq!(cache.get::<u32>("stay"), Some(2));
}

#[test]
fn derived_entries_disappear_with_their_source() {
    let cache = GraphCacheService::default();
    cache.set("list", vec![1_u32, 2, 3], None, &[]);
    cache.set("item:1", 2_u32, None, &["list"]);

    assert_eq!(cache.get::<u32>("item:1"), Some(2));

    cache.invalidate_node("list");

    assert_eq!(cache.get::<u32>("item:1"), None);
    assert_eq!(cache.get::<Vec<u32>>("list"), None);
}
