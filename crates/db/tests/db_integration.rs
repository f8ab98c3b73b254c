//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `chorus_test`)
//!   `TEST_DB_PASSWORD` (default: `chorus_test`)
//!   `TEST_DB_NAME` (default: `chorus_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chorus_common::IdGenerator;
use chorus_db::entities::{
    account,
    moderation_action::{self, ActionType, TargetType},
    moderation_report::{self, ReportStatus, ReportType},
    user_restriction::{self, RestrictionType},
};
use chorus_db::repositories::{ReportRepository, RestrictionRepository};
use chorus_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};

async fn insert_account(conn: &DatabaseConnection, id: &str, username: &str) {
    account::ActiveModel {
        id: Set(id.to_string()),
        username: Set(username.to_string()),
        username_lower: Set(username.to_lowercase()),
        name: Set(None),
        is_suspended: Set(false),
        suspended_until: Set(None),
        suspension_reason: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await
    .unwrap();
}

async fn insert_action(conn: &DatabaseConnection, id: &str, moderator: &str, target: &str) {
    moderation_action::ActiveModel {
        id: Set(id.to_string()),
        moderator_id: Set(moderator.to_string()),
        target_user_id: Set(target.to_string()),
        action_type: Set(ActionType::UserSuspended),
        target_type: Set(TargetType::User),
        target_id: Set(target.to_string()),
        reason: Set("Integration test".to_string()),
        duration_days: Set(None),
        expires_at: Set(None),
        internal_notes: Set(None),
        notification_sent: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();
}

fn restriction_model(
    id: &str,
    user_id: &str,
    action_id: &str,
    reason: &str,
) -> user_restriction::ActiveModel {
    user_restriction::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        restriction_type: Set(RestrictionType::Suspended),
        expires_at: Set(None),
        is_active: Set(true),
        reason: Set(reason.to_string()),
        applied_by: Set("mod1".to_string()),
        related_action_id: Set(action_id.to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_supersede_leaves_exactly_one_active_row() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = Arc::new(db.conn.clone());
    let id_gen = IdGenerator::new();

    insert_account(&conn, "mod1", &format!("mod_{}", id_gen.generate())).await;
    insert_account(&conn, "user1", &format!("user_{}", id_gen.generate())).await;
    insert_action(&conn, "action1", "mod1", "user1").await;
    insert_action(&conn, "action2", "mod1", "user1").await;

    let repo = RestrictionRepository::new(conn.clone());

    // First suspension
    let txn = conn.begin().await.unwrap();
    repo.supersede(
        &txn,
        "user1",
        RestrictionType::Suspended,
        restriction_model("restriction1", "user1", "action1", "First reason"),
    )
    .await
    .unwrap();
    txn.commit().await.unwrap();

    // Re-suspension supersedes rather than stacking
    let txn = conn.begin().await.unwrap();
    repo.supersede(
        &txn,
        "user1",
        RestrictionType::Suspended,
        restriction_model("restriction2", "user1", "action2", "Second reason"),
    )
    .await
    .unwrap();
    txn.commit().await.unwrap();

    let active_count = repo
        .count_active(conn.as_ref(), "user1", RestrictionType::Suspended)
        .await
        .unwrap();
    assert_eq!(active_count, 1);

    let active = repo
        .find_active("user1", RestrictionType::Suspended)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.reason, "Second reason");
    assert_eq!(active.related_action_id, "action2");

    let history = repo.find_for_user("user1").await.unwrap();
    assert_eq!(history.len(), 2);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_active_restriction_unique_index_backstop() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = Arc::new(db.conn.clone());
    let id_gen = IdGenerator::new();

    insert_account(&conn, "mod1", &format!("mod_{}", id_gen.generate())).await;
    insert_account(&conn, "user1", &format!("user_{}", id_gen.generate())).await;
    insert_action(&conn, "action1", "mod1", "user1").await;

    restriction_model("restriction1", "user1", "action1", "First")
        .insert(conn.as_ref())
        .await
        .unwrap();

    // A second active row for the same (user, type) must be refused by the
    // partial unique index even when inserted directly.
    let result = restriction_model("restriction2", "user1", "action1", "Second")
        .insert(conn.as_ref())
        .await;
    assert!(result.is_err());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_report_window() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = Arc::new(db.conn.clone());
    let id_gen = IdGenerator::new();

    insert_account(&conn, "reporter1", &format!("rep_{}", id_gen.generate())).await;

    let repo = ReportRepository::new(conn.clone());

    // A report from 25 hours ago falls outside the 24-hour window
    moderation_report::ActiveModel {
        id: Set("report1".to_string()),
        reporter_id: Set("reporter1".to_string()),
        report_type: Set(ReportType::Post),
        target_id: Set("post1".to_string()),
        comment: Set("Stale report".to_string()),
        status: Set(ReportStatus::Pending),
        assignee_id: Set(None),
        resolution_comment: Set(None),
        created_at: Set((Utc::now() - Duration::hours(25)).into()),
        resolved_at: Set(None),
    }
    .insert(conn.as_ref())
    .await
    .unwrap();

    let cutoff = Utc::now() - Duration::hours(24);
    let stale = repo
        .find_recent_duplicate("reporter1", ReportType::Post, "post1", cutoff)
        .await
        .unwrap();
    assert!(stale.is_none());

    // A fresh report is a duplicate
    moderation_report::ActiveModel {
        id: Set("report2".to_string()),
        reporter_id: Set("reporter1".to_string()),
        report_type: Set(ReportType::Post),
        target_id: Set("post1".to_string()),
        comment: Set("Fresh report".to_string()),
        status: Set(ReportStatus::Pending),
        assignee_id: Set(None),
        resolution_comment: Set(None),
        created_at: Set(Utc::now().into()),
        resolved_at: Set(None),
    }
    .insert(conn.as_ref())
    .await
    .unwrap();

    let fresh = repo
        .find_recent_duplicate("reporter1", ReportType::Post, "post1", cutoff)
        .await
        .unwrap();
    assert_eq!(fresh.map(|r| r.id), Some("report2".to_string()));

    // A different target by the same reporter is not a duplicate
    let other = repo
        .find_recent_duplicate("reporter1", ReportType::Post, "post2", cutoff)
        .await
        .unwrap();
    assert!(other.is_none());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    // Test that default config is valid
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}
