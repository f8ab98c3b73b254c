//! Moderation report repository.

use std::sync::Arc;

use crate::entities::{
    ModerationReport,
    moderation_report::{self, ReportStatus, ReportType},
};
use chorus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Moderation report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new report.
    pub async fn create(
        &self,
        model: moderation_report::ActiveModel,
    ) -> AppResult<moderation_report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<moderation_report::Model> {
        ModerationReport::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Find the newest report by the same reporter for the same target
    /// created after `cutoff`.
    ///
    /// This is the duplicate-report access path: the query walks the
    /// `(reporter_id, report_type, target_id, created_at DESC)` index and the
    /// most recent matching row is sufficient to decide. The cutoff is passed
    /// in rather than computed here so callers control the clock.
    pub async fn find_recent_duplicate(
        &self,
        reporter_id: &str,
        report_type: ReportType,
        target_id: &str,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Option<moderation_report::Model>> {
        ModerationReport::find()
            .filter(moderation_report::Column::ReporterId.eq(reporter_id))
            .filter(moderation_report::Column::ReportType.eq(report_type))
            .filter(moderation_report::Column::TargetId.eq(target_id))
            .filter(moderation_report::Column::CreatedAt.gt(cutoff))
            .order_by_desc(moderation_report::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get pending reports, newest first.
    pub async fn find_pending(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_report::Model>> {
        ModerationReport::find()
            .filter(moderation_report::Column::Status.eq(ReportStatus::Pending))
            .order_by_desc(moderation_report::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count pending reports.
    pub async fn count_pending(&self) -> AppResult<u64> {
        ModerationReport::find()
            .filter(moderation_report::Column::Status.eq(ReportStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get reports against a specific target, newest first.
    pub async fn find_for_target(
        &self,
        report_type: ReportType,
        target_id: &str,
        limit: u64,
    ) -> AppResult<Vec<moderation_report::Model>> {
        ModerationReport::find()
            .filter(moderation_report::Column::ReportType.eq(report_type))
            .filter(moderation_report::Column::TargetId.eq(target_id))
            .order_by_desc(moderation_report::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(
        &self,
        model: moderation_report::ActiveModel,
    ) -> AppResult<moderation_report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, reporter_id: &str, target_id: &str) -> moderation_report::Model {
        moderation_report::Model {
            id: id.to_string(),
            reporter_id: reporter_id.to_string(),
            report_type: ReportType::Post,
            target_id: target_id.to_string(),
            comment: "Spam content".to_string(),
            status: ReportStatus::Pending,
            assignee_id: None,
            resolution_comment: None,
            created_at: Utc::now().into(),
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_recent_duplicate_hit() {
        let report = create_test_report("report1", "user1", "post1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let cutoff = Utc::now() - Duration::hours(24);
        let result = repo
            .find_recent_duplicate("user1", ReportType::Post, "post1", cutoff)
            .await
            .unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_find_recent_duplicate_miss() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<moderation_report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let cutoff = Utc::now() - Duration::hours(24);
        let result = repo
            .find_recent_duplicate("user1", ReportType::Post, "post1", cutoff)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_pending() {
        let report1 = create_test_report("report1", "user1", "post1");
        let report2 = create_test_report("report2", "user2", "post2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report1, report2]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.find_pending(10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
