//! Article submission and moderation properties.

use std::sync::Arc;

use chrono::NaiveDate;

use terry_store_core::{ArticleId, ArticleStatus, NewArticle};
use terry_store_integration_tests::{admin_ctx, user_ctx};
use terry_store_site::db::{MemoryStore, RepositoryError};
use terry_store_site::services::{BlogError, BlogService};

fn article(n: usize) -> NewArticle {
    NewArticle::parse(
        &format!("Sticker story #{n}"),
        "Terry",
        "A longer description that easily clears the twenty character floor.",
        &format!("https://blog.test/story-{n}"),
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
    )
    .expect("valid article")
}

fn service(store: &Arc<MemoryStore>) -> BlogService {
    BlogService::new(Arc::clone(store) as _)
}

#[tokio::test]
async fn test_submission_always_enters_review() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    let submitted = blog
        .submit_article(&admin_ctx(), &article(1))
        .await
        .expect("submit failed");

    assert_eq!(submitted.status, ArticleStatus::Review);
}

#[tokio::test]
async fn test_submission_requires_admin_capability() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    let err = blog
        .submit_article(&user_ctx(), &article(1))
        .await
        .expect_err("non-admin must be rejected");
    assert!(matches!(err, BlogError::Access(_)));
    assert!(blog.list_articles(None).await.is_empty());
}

#[tokio::test]
async fn test_status_filter_includes_and_excludes() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    let submitted = blog
        .submit_article(&admin_ctx(), &article(1))
        .await
        .expect("submit failed");
    blog.submit_article(&admin_ctx(), &article(2))
        .await
        .expect("submit failed");

    blog.set_status(&admin_ctx(), submitted.id, ArticleStatus::Accepted)
        .await
        .expect("status update failed");

    let accepted = blog.list_articles(Some(ArticleStatus::Accepted)).await;
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, submitted.id);

    let in_review = blog.list_articles(Some(ArticleStatus::Review)).await;
    assert_eq!(in_review.len(), 1);
    assert_ne!(in_review[0].id, submitted.id);

    let archived = blog.list_articles(Some(ArticleStatus::Archived)).await;
    assert!(archived.is_empty());
}

#[tokio::test]
async fn test_every_status_can_reach_every_other() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    let submitted = blog
        .submit_article(&admin_ctx(), &article(1))
        .await
        .expect("submit failed");

    // Walk through all statuses, including out of "deleted" - no
    // transition is enforced as terminal.
    let walk = [
        ArticleStatus::Accepted,
        ArticleStatus::Deleted,
        ArticleStatus::Review,
        ArticleStatus::Archived,
        ArticleStatus::Deleted,
        ArticleStatus::Accepted,
    ];

    for status in walk {
        blog.set_status(&admin_ctx(), submitted.id, status)
            .await
            .expect("status update failed");
        let matching = blog.list_articles(Some(status)).await;
        assert_eq!(matching.len(), 1, "expected article in {status}");
    }
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    for n in 1..=3 {
        blog.submit_article(&admin_ctx(), &article(n))
            .await
            .expect("submit failed");
    }

    let all = blog.list_articles(None).await;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "Sticker story #3");
    assert_eq!(all[2].title, "Sticker story #1");
}

#[tokio::test]
async fn test_status_update_for_unknown_article_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    let err = blog
        .set_status(&admin_ctx(), ArticleId::generate(), ArticleStatus::Accepted)
        .await
        .expect_err("unknown id must fail");
    assert!(matches!(
        err,
        BlogError::Repository(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_status_update_requires_admin_capability() {
    let store = Arc::new(MemoryStore::new());
    let blog = service(&store);

    let submitted = blog
        .submit_article(&admin_ctx(), &article(1))
        .await
        .expect("submit failed");

    let err = blog
        .set_status(&user_ctx(), submitted.id, ArticleStatus::Deleted)
        .await
        .expect_err("non-admin must be rejected");
    assert!(matches!(err, BlogError::Access(_)));

    // Status unchanged.
    let in_review = blog.list_articles(Some(ArticleStatus::Review)).await;
    assert_eq!(in_review.len(), 1);
}
