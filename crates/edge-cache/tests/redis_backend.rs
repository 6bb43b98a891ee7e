//! Integration tests for the Redis persistent tier.
//!
//! Tests use testcontainers to spin up a real Redis instance, so they need a
//! Docker daemon: `cargo test -p edge-cache -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use edge_cache::{
    CacheConfig, CacheExpiry, CompanyMembershipObjectCache, DynBackend,
    MembershipExpiration, MemoryBackend, RedisConfig, create_persistent_backend,
};
use edge_core::CompanyMembership;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tokio::sync::OnceCell;

// Shared Redis container for all tests
static SHARED_REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

async fn get_redis_url() -> String {
    let (_, url) = SHARED_REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("start redis container");

            let host_port = container.get_host_port_ipv4(6379).await.expect("get port");
            let url = format!("redis://127.0.0.1:{host_port}");

            (container, url)
        })
        .await;

    url.clone()
}

/// A backend with its own key prefix so tests do not see each other.
async fn redis_backend() -> DynBackend {
    let config = RedisConfig {
        enabled: true,
        url: get_redis_url().await,
        key_prefix: format!("test-{}", uuid::Uuid::new_v4()),
        ..RedisConfig::default()
    };
    let backend = create_persistent_backend(&config).await;
    assert_eq!(backend.backend_name(), "redis");
    backend
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_set_get_delete() {
    let backend = redis_backend().await;

    backend
        .set("k", b"value".to_vec(), CacheExpiry::Permanent, &[])
        .await;
    assert_eq!(backend.get("k").await, Some(Arc::new(b"value".to_vec())));

    backend.delete("k").await;
    assert!(backend.get("k").await.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_expiry() {
    let backend = redis_backend().await;

    backend
        .set(
            "k",
            b"v".to_vec(),
            CacheExpiry::After(Duration::from_secs(1)),
            &[],
        )
        .await;
    assert!(backend.get("k").await.is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(backend.get("k").await.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_tag_invalidation() {
    let backend = redis_backend().await;
    assert!(backend.capabilities().tag_invalidation);

    backend
        .set("a", b"1".to_vec(), CacheExpiry::Permanent, &["t".to_string()])
        .await;
    backend
        .set("b", b"2".to_vec(), CacheExpiry::Permanent, &["t".to_string(), "u".to_string()])
        .await;
    backend
        .set("c", b"3".to_vec(), CacheExpiry::Permanent, &["u".to_string()])
        .await;

    backend.invalidate_tags(&["t".to_string()]).await;

    assert!(backend.get("a").await.is_none());
    assert!(backend.get("b").await.is_none());
    assert!(backend.get("c").await.is_some());

    backend.delete_all().await;
    assert!(backend.get("c").await.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_all_spans_scan_batches_and_keeps_other_prefixes() {
    let backend = redis_backend().await;
    let neighbour = redis_backend().await;
    neighbour
        .set("kept", b"v".to_vec(), CacheExpiry::Permanent, &[])
        .await;
    for i in 0..1200 {
        backend
            .set(&format!("k{i}"), b"v".to_vec(), CacheExpiry::Permanent, &["t".to_string()])
            .await;
    }

    backend.delete_all().await;

    for i in [0, 599, 1199] {
        assert!(backend.get(&format!("k{i}")).await.is_none());
    }
    assert!(neighbour.get("kept").await.is_some());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_membership_survives_process_restart() {
    let persistent = redis_backend().await;
    let membership = CompanyMembership::from_members(["a@example.com"]);

    let first = CompanyMembershipObjectCache::new(
        MemoryBackend::shared(),
        Arc::clone(&persistent),
        MembershipExpiration::from_secs(60),
    );
    first.save_membership("acme", &membership).await;

    // A fresh memory tier stands in for a new process.
    let second = CompanyMembershipObjectCache::new(
        MemoryBackend::shared(),
        persistent,
        MembershipExpiration::from_secs(60),
    );
    assert_eq!(second.get_membership("acme").await, Some(membership));

    second.remove_membership("acme").await;
    assert!(first.persistent().get("company:acme").await.is_none());
}

#[tokio::test]
async fn test_unreachable_redis_falls_back_to_memory() {
    let mut config = CacheConfig::default().redis;
    config.enabled = true;
    config.url = "redis://127.0.0.1:1".to_string();
    config.timeout_ms = 200;

    let backend = create_persistent_backend(&config).await;
    assert_eq!(backend.backend_name(), "memory");
}
