//! Storage layer tests for the awards database.

#![allow(clippy::unwrap_used)]

use super::db::AwardsDatabase;
use super::models::VoteAction;
use super::votes::VoteError;
use crate::db::DatabaseError;
use crate::validation::{CategoryFields, NomineeFields};

async fn test_db() -> AwardsDatabase {
    AwardsDatabase::open_in_memory().await.unwrap()
}

fn category(name: &str) -> CategoryFields {
    CategoryFields {
        name: name.to_string(),
        description: format!("{name} description"),
        voting_locked: false,
    }
}

fn nominee(name: &str, category_id: &str) -> NomineeFields {
    NomineeFields {
        name: name.to_string(),
        category_id: category_id.to_string(),
        ..NomineeFields::default()
    }
}

/// One category `c1` with nominees `a`, `b`, `c`.
async fn seeded_db() -> AwardsDatabase {
    let db = test_db().await;
    db.create_category("c1", &category("Best Picture"))
        .await
        .unwrap();
    for id in ["a", "b", "c"] {
        db.create_nominee(id, &nominee(&format!("Nominee {id}"), "c1"))
            .await
            .unwrap();
    }
    db
}

// === Category tests ===

#[tokio::test]
async fn create_and_get_category() {
    let db = test_db().await;
    let created = db
        .create_category("c1", &category("Best Picture"))
        .await
        .unwrap();

    assert_eq!(created.id, "c1");
    assert_eq!(created.name, "Best Picture");
    assert!(!created.voting_locked);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = db.get_category("c1").await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicate_category_name_conflicts() {
    let db = test_db().await;
    db.create_category("c1", &category("Best Picture"))
        .await
        .unwrap();

    let err = db
        .create_category("c2", &category("Best Picture"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn list_categories_in_creation_order() {
    let db = test_db().await;
    for (id, name) in [("c1", "Best Picture"), ("c2", "Best Director"), ("c3", "Best Actor")] {
        db.create_category(id, &category(name)).await.unwrap();
    }

    let names: Vec<String> = db
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Best Picture", "Best Director", "Best Actor"]);
}

#[tokio::test]
async fn update_category_fields() {
    let db = test_db().await;
    db.create_category("c1", &category("Best Picture"))
        .await
        .unwrap();

    let updated = db
        .update_category(
            "c1",
            &CategoryFields {
                name: "Best Film".into(),
                description: "renamed".into(),
                voting_locked: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Best Film");
    assert!(updated.voting_locked);

    let err = db
        .update_category("missing", &category("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn remove_category_cascades_to_nominees_and_votes() {
    let db = seeded_db().await;
    db.create_category("c2", &category("Best Director"))
        .await
        .unwrap();
    db.create_nominee("d", &nominee("Director", "c2"))
        .await
        .unwrap();

    db.record_vote("c1", "a", "10.0.0.1").await.unwrap();
    db.record_vote("c1", "b", "10.0.0.2").await.unwrap();
    db.record_vote("c2", "d", "10.0.0.1").await.unwrap();

    let removal = db.remove_category("c1").await.unwrap();
    assert_eq!(removal.category.id, "c1");
    assert_eq!(removal.nominees.len(), 3);
    assert_eq!(removal.deleted_votes, 2);

    assert!(matches!(
        db.get_category("c1").await.unwrap_err(),
        DatabaseError::NotFound(_)
    ));
    assert!(db.list_nominees(Some("c1")).await.unwrap().is_empty());
    assert_eq!(db.count_votes("c1").await.unwrap(), 0);

    // The other category is untouched.
    assert_eq!(db.list_nominees(Some("c2")).await.unwrap().len(), 1);
    assert_eq!(db.count_votes("c2").await.unwrap(), 1);
}

#[tokio::test]
async fn remove_missing_category_is_not_found() {
    let db = test_db().await;
    let err = db.remove_category("missing").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

// === Nominee tests ===

#[tokio::test]
async fn nominee_requires_existing_category() {
    let db = test_db().await;
    let err = db
        .create_nominee("n1", &nominee("Orphan", "missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidReference(_)), "got {err:?}");
}

#[tokio::test]
async fn list_nominees_filters_by_category() {
    let db = seeded_db().await;
    db.create_category("c2", &category("Best Director"))
        .await
        .unwrap();
    db.create_nominee("d", &nominee("Director", "c2"))
        .await
        .unwrap();

    assert_eq!(db.list_nominees(None).await.unwrap().len(), 4);
    let ids: Vec<String> = db
        .list_nominees(Some("c1"))
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn update_and_clear_nominee_image() {
    let db = seeded_db().await;
    let fields = NomineeFields {
        image_url: Some("/uploads/a_1.png".into()),
        youtube_url: Some("https://youtube.com/watch?v=1".into()),
        ..nominee("Renamed", "c1")
    };
    let updated = db.update_nominee("a", &fields).await.unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.image_url.as_deref(), Some("/uploads/a_1.png"));

    let before = db.clear_nominee_image("a").await.unwrap();
    assert_eq!(before.image_url.as_deref(), Some("/uploads/a_1.png"));

    let after = db.get_nominee("a").await.unwrap();
    assert!(after.image_url.is_none());
    assert_eq!(
        after.youtube_url.as_deref(),
        Some("https://youtube.com/watch?v=1")
    );
}

#[tokio::test]
async fn remove_nominee_deletes_its_votes() {
    let db = seeded_db().await;
    db.record_vote("c1", "a", "10.0.0.1").await.unwrap();
    db.record_vote("c1", "a", "10.0.0.2").await.unwrap();
    db.record_vote("c1", "b", "10.0.0.3").await.unwrap();

    let removal = db.remove_nominee("a").await.unwrap();
    assert_eq!(removal.nominee.id, "a");
    assert_eq!(removal.deleted_votes, 2);
    assert_eq!(db.count_votes("c1").await.unwrap(), 1);
    assert!(db.get_nominee("a").await.is_err());
}

// === Vote tests ===

#[tokio::test]
async fn second_vote_from_same_voter_updates_in_place() {
    let db = seeded_db().await;

    let first = db.record_vote("c1", "a", "10.0.0.1").await.unwrap();
    assert_eq!(first.action, VoteAction::Created);

    let second = db.record_vote("c1", "b", "10.0.0.1").await.unwrap();
    assert_eq!(second.action, VoteAction::Updated);
    assert_eq!(second.vote.id, first.vote.id);
    assert_eq!(second.vote.nominee_id, "b");

    assert_eq!(db.count_votes("c1").await.unwrap(), 1);
    let stored = db.get_vote("c1", "10.0.0.1").await.unwrap().unwrap();
    assert_eq!(stored.nominee_id, "b");
}

#[tokio::test]
async fn different_voters_each_get_a_vote() {
    let db = seeded_db().await;
    db.record_vote("c1", "a", "10.0.0.1").await.unwrap();
    let other = db.record_vote("c1", "a", "10.0.0.2").await.unwrap();
    assert_eq!(other.action, VoteAction::Created);
    assert_eq!(db.count_votes("c1").await.unwrap(), 2);
}

#[tokio::test]
async fn vote_in_locked_category_is_forbidden_and_stores_nothing() {
    let db = seeded_db().await;
    db.update_category(
        "c1",
        &CategoryFields {
            voting_locked: true,
            ..category("Best Picture")
        },
    )
    .await
    .unwrap();

    let err = db.record_vote("c1", "a", "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, VoteError::VotingLocked));
    assert_eq!(db.count_votes("c1").await.unwrap(), 0);
    assert!(db.get_vote("c1", "10.0.0.1").await.unwrap().is_none());
}

#[tokio::test]
async fn vote_for_unknown_category_is_not_found() {
    let db = seeded_db().await;
    let err = db.record_vote("missing", "a", "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, VoteError::CategoryNotFound));
}

#[tokio::test]
async fn vote_is_recorded_without_checking_nominee_membership() {
    let db = seeded_db().await;
    db.create_category("c2", &category("Best Director"))
        .await
        .unwrap();

    // "a" belongs to c1; "ghost" is not a nominee at all.
    let foreign = db.record_vote("c2", "a", "10.0.0.1").await.unwrap();
    assert_eq!(foreign.vote.nominee_id, "a");
    assert_eq!(foreign.vote.category_id, "c2");

    let unknown = db.record_vote("c2", "ghost", "10.0.0.2").await.unwrap();
    assert_eq!(unknown.action, VoteAction::Created);
    assert_eq!(db.count_votes("c2").await.unwrap(), 2);

    let results = db.tally_results("c2").await.unwrap();
    let ghost = results.iter().find(|r| r.nominee_id == "ghost").unwrap();
    assert_eq!(ghost.vote_count, 1);
    assert!(ghost.nominee.is_none());
}

// === Results tests ===

#[tokio::test]
async fn results_are_ranked_and_omit_nominees_without_votes() {
    let db = seeded_db().await;
    for i in 0..3 {
        db.record_vote("c1", "a", &format!("10.0.1.{i}")).await.unwrap();
    }
    for i in 0..5 {
        db.record_vote("c1", "b", &format!("10.0.2.{i}")).await.unwrap();
    }

    let results = db.tally_results("c1").await.unwrap();
    let ranked: Vec<(&str, i64)> = results
        .iter()
        .map(|r| (r.nominee_id.as_str(), r.vote_count))
        .collect();
    assert_eq!(ranked, [("b", 5), ("a", 3)]);
    assert_eq!(results[0].nominee.as_ref().unwrap().name, "Nominee b");
}

#[tokio::test]
async fn results_break_ties_by_nominee_id() {
    let db = seeded_db().await;
    db.record_vote("c1", "c", "10.0.0.1").await.unwrap();
    db.record_vote("c1", "a", "10.0.0.2").await.unwrap();

    let ids: Vec<String> = db
        .tally_results("c1")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.nominee_id)
        .collect();
    assert_eq!(ids, ["a", "c"]);
}

#[tokio::test]
async fn results_keep_counts_for_vanished_nominees() {
    let db = seeded_db().await;
    db.record_vote("c1", "a", "10.0.0.1").await.unwrap();

    // Simulate metadata that disappeared without the vote cascade.
    sqlx::query("DELETE FROM nominees WHERE id = 'a'")
        .execute(db.pool())
        .await
        .unwrap();

    let results = db.tally_results("c1").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].nominee_id, "a");
    assert_eq!(results[0].vote_count, 1);
    assert!(results[0].nominee.is_none());
}

#[tokio::test]
async fn results_for_empty_category_are_empty() {
    let db = seeded_db().await;
    assert!(db.tally_results("c1").await.unwrap().is_empty());
    assert!(db.tally_results("missing").await.unwrap().is_empty());
}

// === Admin tests ===

#[tokio::test]
async fn ensure_admin_only_inserts_once() {
    let db = test_db().await;
    assert!(db.ensure_admin("u1", "admin", "hash-1").await.unwrap());
    assert!(!db.ensure_admin("u2", "admin", "hash-2").await.unwrap());

    let admin = db.get_admin_by_username("admin").await.unwrap();
    assert_eq!(admin.id, "u1");
    assert_eq!(admin.password_hash, "hash-1");
    assert_eq!(admin.role, "admin");
    assert!(admin.password_changed_at.is_none());
}

#[tokio::test]
async fn update_admin_password_stamps_change_time() {
    let db = test_db().await;
    db.create_admin("u1", "nimi", "old").await.unwrap();

    db.update_admin_password("nimi", "new").await.unwrap();
    let admin = db.get_admin_by_username("nimi").await.unwrap();
    assert_eq!(admin.password_hash, "new");
    assert!(admin.password_changed_at.is_some());

    let err = db.update_admin_password("ghost", "x").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn admin_hash_is_not_serialized() {
    let db = test_db().await;
    let admin = db.create_admin("u1", "admin", "secret-hash").await.unwrap();
    let json = serde_json::to_string(&admin).unwrap();
    assert!(!json.contains("secret-hash"));
    assert!(json.contains("\"username\":\"admin\""));
}

// === Maintenance tests ===

#[tokio::test]
async fn stats_and_clear_registry() {
    let db = seeded_db().await;
    db.record_vote("c1", "a", "10.0.0.1").await.unwrap();
    db.create_admin("u1", "admin", "hash").await.unwrap();

    let stats = db.category_stats().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].nominee_count, 3);
    assert_eq!(stats[0].vote_count, 1);

    assert_eq!(db.clear_registry().await.unwrap(), 1);
    assert!(db.list_categories().await.unwrap().is_empty());
    assert!(db.list_nominees(None).await.unwrap().is_empty());
    assert!(db.get_admin_by_username("admin").await.is_ok());
}
