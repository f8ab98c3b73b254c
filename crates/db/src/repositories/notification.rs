//! Notification repository.

use std::sync::Arc;

use crate::entities::{
    Notification,
    notification::{self, NotificationType},
};
use chorus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new notification.
    pub async fn create(
        &self,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a notification by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<notification::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))
    }

    /// Update a notification.
    pub async fn update(
        &self,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get notifications for a user, newest first.
    pub async fn find_for_user(
        &self,
        notifiee_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .order_by_desc(notification::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, id: &str) -> AppResult<()> {
        Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Find the newest moderation notification delivered to a user that is
    /// not itself a reversal (used to anchor reversal linkage).
    pub async fn find_latest_moderation(
        &self,
        notifiee_id: &str,
    ) -> AppResult<Option<notification::Model>> {
        Notification::find()
            .filter(notification::Column::NotifieeId.eq(notifiee_id))
            .filter(notification::Column::NotificationType.eq(NotificationType::Moderation))
            .filter(notification::Column::RelatedNotificationId.is_null())
            .order_by_desc(notification::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_notification(id: &str, notifiee_id: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            notifiee_id: notifiee_id.to_string(),
            notifier_id: None,
            notification_type: NotificationType::Moderation,
            target_id: Some("action1".to_string()),
            body: Some("Your account has been suspended".to_string()),
            related_notification_id: None,
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_latest_moderation() {
        let n = create_test_notification("notif1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.find_latest_moderation("user1").await.unwrap();

        assert_eq!(result.map(|n| n.id), Some("notif1".to_string()));
    }
}
