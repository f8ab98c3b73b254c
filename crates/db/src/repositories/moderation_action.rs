//! Moderation action repository.

use std::sync::Arc;

use crate::entities::{ModerationAction, moderation_action};
use chorus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// Moderation action repository for database operations.
#[derive(Clone)]
pub struct ModerationActionRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationActionRepository {
    /// Create a new moderation action repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new action on the caller's connection.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: moderation_action::ActiveModel,
    ) -> AppResult<moderation_action::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an action by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<moderation_action::Model>> {
        ModerationAction::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an action by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<moderation_action::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Moderation action {id} not found")))
    }

    /// Update an action's expiry in place (link mode).
    ///
    /// Only `expires_at` and `duration_days` may change after creation;
    /// identity, moderator and target are immutable.
    pub async fn update_expiry<C: ConnectionTrait>(
        &self,
        conn: &C,
        action: moderation_action::Model,
        expires_at: Option<DateTimeWithTimeZone>,
        duration_days: Option<i32>,
    ) -> AppResult<moderation_action::Model> {
        let mut model: moderation_action::ActiveModel = action.into();
        model.expires_at = Set(expires_at);
        model.duration_days = Set(duration_days);

        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flag that the target has been notified about an action.
    pub async fn mark_notification_sent(&self, id: &str) -> AppResult<()> {
        ModerationAction::update_many()
            .col_expr(
                moderation_action::Column::NotificationSent,
                Expr::value(true),
            )
            .filter(moderation_action::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Get actions taken against a user, newest first.
    pub async fn find_for_user(
        &self,
        target_user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<moderation_action::Model>> {
        ModerationAction::find()
            .filter(moderation_action::Column::TargetUserId.eq(target_user_id))
            .order_by_desc(moderation_action::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get recent actions across all targets, newest first.
    pub async fn find_recent(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_action::Model>> {
        ModerationAction::find()
            .order_by_desc(moderation_action::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::moderation_action::{ActionType, TargetType};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_action(id: &str, target: &str) -> moderation_action::Model {
        moderation_action::Model {
            id: id.to_string(),
            moderator_id: "mod1".to_string(),
            target_user_id: target.to_string(),
            action_type: ActionType::UserSuspended,
            target_type: TargetType::User,
            target_id: target.to_string(),
            reason: "Spam".to_string(),
            duration_days: Some(7),
            expires_at: None,
            internal_notes: None,
            notification_sent: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<moderation_action::Model>::new()])
                .into_connection(),
        );

        let repo = ModerationActionRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_for_user() {
        let action1 = create_test_action("action1", "user1");
        let action2 = create_test_action("action2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[action1, action2]])
                .into_connection(),
        );

        let repo = ModerationActionRepository::new(db);
        let result = repo.find_for_user("user1", 10).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
