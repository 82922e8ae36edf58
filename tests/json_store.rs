mod common;

use rating_board::{
    db::{JsonFileStore, ReviewStore, StoreError},
    models::Variant,
};
use tempfile::TempDir;

use common::new_review;

async fn open_temp() -> (TempDir, JsonFileStore) {
    open_temp_as(Variant::Rating).await
}

async fn open_temp_as(variant: Variant) -> (TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("data").join("reviews.json"), variant)
        .await
        .expect("open store");
    (dir, store)
}

#[tokio::test]
async fn test_open_creates_empty_document() {
    let (_dir, store) = open_temp().await;

    let raw = std::fs::read_to_string(store.path()).expect("read file");
    assert_eq!(raw.trim(), "[]");
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_and_ordering() {
    let (_dir, store) = open_temp().await;
    common::ids_are_unique_and_timestamps_non_decreasing(&store).await;
}

#[tokio::test]
async fn test_subject_listing() {
    let (_dir, store) = open_temp().await;
    common::subject_listing_is_an_ordered_subset(&store).await;
}

#[tokio::test]
async fn test_average() {
    let (_dir, store) = open_temp().await;
    common::average_matches_mean(&store).await;
}

#[tokio::test]
async fn test_delete_twice() {
    let (_dir, store) = open_temp().await;
    common::delete_succeeds_once(&store).await;
}

#[tokio::test]
async fn test_update_round_trip() {
    let (_dir, store) = open_temp().await;
    common::update_round_trips(&store).await;
}

#[tokio::test]
async fn test_zero_score_without_text_is_rejected() {
    let (_dir, store) = open_temp().await;
    common::zero_score_requires_text(&store).await;
}

#[tokio::test]
async fn test_records_survive_reopen_and_ids_resume() {
    let (dir, store) = open_temp().await;
    let path = store.path().to_path_buf();

    let first = store
        .create(new_review("stall-7", "Alice", 5, Some("Great")))
        .await
        .unwrap();
    let second = store
        .create(new_review("stall-7", "Bob", 3, None))
        .await
        .unwrap();
    store.delete(second.id).await.unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path, Variant::Rating)
        .await
        .expect("reopen");
    let all = reopened.list_all().await.unwrap();
    assert_eq!(all, vec![first.clone()]);

    let third = reopened
        .create(new_review("stall-7", "Cara", 4, None))
        .await
        .unwrap();
    assert!(third.id > first.id);
    assert!(third.created_at >= first.created_at);

    drop(dir);
}

#[tokio::test]
async fn test_document_uses_camel_case_fields() {
    let (_dir, store) = open_temp().await;
    store
        .create(new_review("stall-1", "Alice", 4, Some("Tasty")))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &doc[0];
    assert_eq!(entry["subjectId"], "stall-1");
    assert_eq!(entry["authorName"], "Alice");
    assert_eq!(entry["score"], 4);
    assert_eq!(entry["text"], "Tasty");
    assert!(entry["createdAt"].is_string());
}

#[tokio::test]
async fn test_corrupt_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = JsonFileStore::open(&path, Variant::Review).await;
    assert!(matches!(result, Err(StoreError::Json(_))));
}

#[tokio::test]
async fn test_failed_write_leaves_memory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    let store = JsonFileStore::open(&path, Variant::Review).await.unwrap();
    store
        .create(new_review("p1", "Alice", 5, None))
        .await
        .unwrap();

    // Swap the document for a directory so the next write fails.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let result = store.create(new_review("p1", "Bob", 4, None)).await;
    assert!(matches!(result, Err(StoreError::Io(_))));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_scores_outside_the_scale_are_rejected() {
    let (_dir, store) = open_temp_as(Variant::Review).await;
    common::scores_outside_the_scale_are_rejected(&store).await;
}

#[tokio::test]
async fn test_exhausted_ids_fail_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    let doc = serde_json::json!([{
        "id": i64::MAX,
        "subjectId": "stall-1",
        "authorName": "Alice",
        "score": 4,
        "text": null,
        "createdAt": "2026-01-01T00:00:00Z"
    }]);
    std::fs::write(&path, doc.to_string()).unwrap();

    let result = JsonFileStore::open(&path, Variant::Review).await;
    assert!(matches!(result, Err(StoreError::IdsExhausted)));
}

#[tokio::test]
async fn test_last_id_is_not_handed_out_twice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.json");
    let doc = serde_json::json!([{
        "id": i64::MAX - 1,
        "subjectId": "stall-1",
        "authorName": "Alice",
        "score": 4,
        "text": null,
        "createdAt": "2026-01-01T00:00:00Z"
    }]);
    std::fs::write(&path, doc.to_string()).unwrap();

    let store = JsonFileStore::open(&path, Variant::Review).await.unwrap();
    let result = store.create(new_review("stall-1", "Bob", 2, None)).await;
    assert!(matches!(result, Err(StoreError::IdsExhausted)));
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}
