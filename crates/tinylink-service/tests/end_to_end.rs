//! Full engine flow against the in-memory repository and Moka cache.

use tinylink_cache::MokaLinkCache;
use tinylink_core::{RandomCodeGenerator, ShortCode, UserId};
use tinylink_service::{LinkService, Shortener};
use tinylink_storage::InMemoryRepository;

const BASE_URL: &str = "https://amtinyurl.com";

fn service() -> LinkService<InMemoryRepository, MokaLinkCache, RandomCodeGenerator> {
    LinkService::new(
        InMemoryRepository::new(),
        MokaLinkCache::new(),
        RandomCodeGenerator,
        BASE_URL,
    )
}

#[tokio::test]
async fn create_resubmit_and_share_across_users() {
    let service = service();
    let alice = UserId::parse("abc123").unwrap();
    let bob = UserId::parse("xyz789").unwrap();

    // First submission creates a fresh 7-character code.
    let created = service.create_or_get("example.com/a", &alice).await.unwrap();
    assert!(!created.existed);
    assert_eq!(created.normalized_url, "https://example.com/a");
    assert!(ShortCode::is_valid_format(created.code.as_str()));
    assert_eq!(
        created.short_url,
        format!("{BASE_URL}/{}", created.code.as_str())
    );

    // Same URL, same user: idempotent, same code.
    let resubmitted = service.create_or_get("example.com/a", &alice).await.unwrap();
    assert!(resubmitted.existed);
    assert_eq!(resubmitted.code, created.code);

    // Same URL, different user: shared code, fresh ownership row.
    let shared = service.create_or_get("example.com/a", &bob).await.unwrap();
    assert!(shared.existed);
    assert_eq!(shared.code, created.code);

    let bobs = service.list(&bob).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].code, created.code);
    assert_eq!(bobs[0].normalized_url, "https://example.com/a");

    // Redirection resolves for everyone, including uppercase input.
    let resolved = service
        .resolve(&created.code.as_str().to_ascii_uppercase())
        .await
        .unwrap();
    assert_eq!(resolved.as_deref(), Some("https://example.com/a"));
}

#[tokio::test]
async fn listing_is_per_user_and_newest_first() {
    let service = service();
    let user = UserId::parse("abc123").unwrap();

    let first = service.create_or_get("example.com/1", &user).await.unwrap();
    let second = service.create_or_get("example.com/2", &user).await.unwrap();

    let listed = service.list(&user).await.unwrap();
    assert_eq!(listed.len(), 2);
    let codes: Vec<&str> = listed.iter().map(|l| l.code.as_str()).collect();
    assert!(codes.contains(&first.code.as_str()));
    assert!(codes.contains(&second.code.as_str()));
    // Associations created in the same instant fall back to a
    // deterministic code order; later ones always sort first.
    assert!(listed[0].created_at >= listed[1].created_at);

    // Deleting an association is scoped to (user, code).
    assert!(service.remove(&user, first.code.as_str()).await.unwrap());
    assert!(!service.remove(&user, first.code.as_str()).await.unwrap());
    assert_eq!(service.list(&user).await.unwrap().len(), 1);
    assert!(service.resolve(first.code.as_str()).await.unwrap().is_some());
}
