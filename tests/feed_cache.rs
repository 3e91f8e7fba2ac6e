//! Global-feed cache behavior at the service level: bounded staleness
//! inside the TTL, fresh content after expiry or an explicit flush.

mod support;

use std::time::Duration;

use tribuna::application::feeds::FeedService;
use tribuna::cache::{CacheConfig, FeedCache};
use std::sync::Arc;

use support::{MemoryRepos, social_service};

fn feed_service_with_cache(
    repos: &Arc<MemoryRepos>,
    ttl: Duration,
) -> (FeedService, Arc<FeedCache>) {
    let cache = Arc::new(FeedCache::new(CacheConfig::with_ttl(ttl)));
    let service = FeedService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        social_service(repos),
        cache.clone(),
    );
    (service, cache)
}

#[tokio::test]
async fn global_timeline_is_stale_within_the_ttl() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    repos.add_post(&alice, None, "old post");

    let (feeds, _cache) = feed_service_with_cache(&repos, Duration::from_secs(60));

    let first = feeds.global_timeline(1).await.expect("feed");
    assert_eq!(first.items.len(), 1);

    repos.add_post(&alice, None, "new post");

    // Still the cached page; the write is invisible until expiry or flush.
    let second = feeds.global_timeline(1).await.expect("feed");
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].text, "old post");
}

#[tokio::test]
async fn flush_makes_new_posts_visible_immediately() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    repos.add_post(&alice, None, "old post");

    let (feeds, cache) = feed_service_with_cache(&repos, Duration::from_secs(60));
    feeds.global_timeline(1).await.expect("warm the cache");

    repos.add_post(&alice, None, "new post");
    cache.flush();

    let page = feeds.global_timeline(1).await.expect("feed");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].text, "new post");
}

#[tokio::test]
async fn expiry_makes_new_posts_visible() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    repos.add_post(&alice, None, "old post");

    let (feeds, _cache) = feed_service_with_cache(&repos, Duration::from_millis(20));
    feeds.global_timeline(1).await.expect("warm the cache");

    repos.add_post(&alice, None, "new post");
    tokio::time::sleep(Duration::from_millis(40)).await;

    let page = feeds.global_timeline(1).await.expect("feed");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].text, "new post");
}

#[tokio::test]
async fn out_of_range_page_numbers_share_the_clamped_entry() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    for i in 0..13 {
        repos.add_post(&alice, None, &format!("post {i}"));
    }

    let (feeds, cache) = feed_service_with_cache(&repos, Duration::from_secs(60));

    let clamped = feeds.global_timeline(99).await.expect("clamped page");
    assert_eq!(clamped.number, 2);
    assert_eq!(cache.len(), 1);

    // Scanning past-the-end page numbers must not grow the map.
    for requested in [3, 50, 77, u32::MAX] {
        let page = feeds.global_timeline(requested).await.expect("page");
        assert_eq!(page.number, 2);
    }
    assert_eq!(cache.len(), 1);

    // The canonical request is served from the same entry.
    let direct = feeds.global_timeline(2).await.expect("page 2");
    assert_eq!(direct, clamped);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn pages_are_cached_independently() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    for i in 0..13 {
        repos.add_post(&alice, None, &format!("post {i}"));
    }

    let (feeds, cache) = feed_service_with_cache(&repos, Duration::from_secs(60));
    feeds.global_timeline(1).await.expect("page 1");
    feeds.global_timeline(2).await.expect("page 2");
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn only_the_global_scope_is_cached() {
    let repos = MemoryRepos::new();
    let alice = repos.add_user("alice");
    let rust = repos.add_group("rust", "Rust");
    repos.add_post(&alice, Some(&rust), "old post");

    let (feeds, cache) = feed_service_with_cache(&repos, Duration::from_secs(60));
    feeds.group_timeline("rust", 1).await.expect("group feed");
    feeds
        .author_timeline("alice", tribuna::domain::identity::Viewer::Anonymous, 1)
        .await
        .expect("author feed");
    assert!(cache.is_empty());

    repos.add_post(&alice, Some(&rust), "new post");
    let feed = feeds.group_timeline("rust", 1).await.expect("group feed");
    assert_eq!(feed.page.items.len(), 2, "uncached scopes read through");
}
