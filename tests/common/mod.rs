#![allow(dead_code)]

use rating_board::{
    db::{ReviewStore, StoreError},
    models::{NewReview, ReviewChanges},
    validation::ValidationError,
};

pub fn new_review(subject: &str, author: &str, score: i64, text: Option<&str>) -> NewReview {
    NewReview {
        subject_id: subject.to_string(),
        author_name: author.to_string(),
        score,
        text: text.map(str::to_string),
    }
}

pub fn changes(author: &str, score: i64, text: Option<&str>) -> ReviewChanges {
    ReviewChanges {
        author_name: author.to_string(),
        score,
        text: text.map(str::to_string),
    }
}

pub async fn ids_are_unique_and_timestamps_non_decreasing(store: &dyn ReviewStore) {
    let mut created = Vec::new();
    for i in 0..5 {
        let review = store
            .create(new_review("p1", "Alice", (i % 5) + 1, Some("ok")))
            .await
            .expect("create");
        created.push(review);
    }

    for pair in created.windows(2) {
        assert!(pair[0].id < pair[1].id, "ids must increase");
        assert!(pair[0].created_at <= pair[1].created_at);
    }

    let all = store.list_all().await.expect("list");
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    let mut expected: Vec<i64> = created.iter().map(|r| r.id).collect();
    expected.reverse();
    assert_eq!(ids, expected, "listing is newest first");
}

pub async fn subject_listing_is_an_ordered_subset(store: &dyn ReviewStore) {
    for (subject, author) in [("p1", "Alice"), ("p2", "Bob"), ("p1", "Cara"), ("p3", "Dan")] {
        store
            .create(new_review(subject, author, 4, None))
            .await
            .expect("create");
    }

    let all = store.list_all().await.expect("list all");
    let p1 = store.list_by_subject("p1").await.expect("list p1");
    let expected: Vec<_> = all.into_iter().filter(|r| r.subject_id == "p1").collect();

    assert_eq!(p1, expected);
    assert_eq!(p1.len(), 2);
    assert_eq!(p1[0].author_name, "Cara");
    assert!(store.list_by_subject("nobody").await.expect("list").is_empty());
}

pub async fn average_matches_mean(store: &dyn ReviewStore) {
    let empty = store.average_for("p9").await.expect("average");
    assert_eq!(empty.average_rating, 0.0);
    assert_eq!(empty.total_ratings, 0);

    for score in [5, 4, 2] {
        store
            .create(new_review("p9", "Alice", score, None))
            .await
            .expect("create");
    }
    store
        .create(new_review("p8", "Bob", 1, None))
        .await
        .expect("create");

    let summary = store.average_for("p9").await.expect("average");
    assert_eq!(summary.total_ratings, 3);
    assert!((summary.average_rating - 11.0 / 3.0).abs() < 1e-9);
}

pub async fn delete_succeeds_once(store: &dyn ReviewStore) {
    let review = store
        .create(new_review("p1", "Alice", 5, Some("Great")))
        .await
        .expect("create");

    let outcome = store.delete(review.id).await.expect("first delete");
    assert_eq!(outcome.deleted_count, 1);

    let second = store.delete(review.id).await;
    assert!(matches!(second, Err(StoreError::NotFound(id)) if id == review.id));
    assert!(store.list_all().await.expect("list").is_empty());
}

pub async fn update_round_trips(store: &dyn ReviewStore) {
    let original = store
        .create(new_review("p1", "Alice", 3, Some("fine")))
        .await
        .expect("create");

    let updated = store
        .update(original.id, changes("Alicia", 5, Some("better now")))
        .await
        .expect("update");

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.subject_id, "p1");
    assert!(updated.created_at >= original.created_at);

    let read = store.list_by_subject("p1").await.expect("list");
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].author_name, "Alicia");
    assert_eq!(read[0].score, 5);
    assert_eq!(read[0].text.as_deref(), Some("better now"));
    assert_eq!(read[0].id, original.id);

    let missing = store.update(9_999, changes("Bob", 2, None)).await;
    assert!(matches!(missing, Err(StoreError::NotFound(9_999))));
}

pub async fn zero_score_requires_text(store: &dyn ReviewStore) {
    let rejected = store.create(new_review("p1", "Alice", 0, Some("  "))).await;
    assert!(matches!(
        rejected,
        Err(StoreError::Validation(ValidationError::MissingField("text")))
    ));
    assert!(store.list_all().await.expect("list").is_empty());
}

/// Expects a store opened for `Variant::Review` (scores 1 to 5).
pub async fn scores_outside_the_scale_are_rejected(store: &dyn ReviewStore) {
    let zero = store
        .create(new_review("stall-1", "Alice", 0, Some("no stars")))
        .await;
    assert!(matches!(
        zero,
        Err(StoreError::Validation(ValidationError::OutOfRange { min: 1, max: 5, got: 0 }))
    ));

    let high = store.create(new_review("stall-1", "Alice", 6, None)).await;
    assert!(matches!(
        high,
        Err(StoreError::Validation(ValidationError::OutOfRange { got: 6, .. }))
    ));

    let kept = store
        .create(new_review("stall-1", "Alice", 3, None))
        .await
        .expect("create");
    let bumped = store.update(kept.id, changes("Alice", 9, None)).await;
    assert!(matches!(
        bumped,
        Err(StoreError::Validation(ValidationError::OutOfRange { got: 9, .. }))
    ));

    let all = store.list_all().await.expect("list");
    assert_eq!(all, vec![kept]);
}
