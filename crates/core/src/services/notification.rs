//! Notification service.
//!
//! Creates moderation notifications and maintains the reversal linkage: a
//! reversal notification may carry a back-reference to the original action
//! notification it reverses. The reference is written once, at creation or
//! via [`NotificationService::link_reversal`], and never retro-edited.

use chorus_common::{AppError, AppResult, IdGenerator};
use chorus_db::{
    entities::notification::{self, NotificationType},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a moderation notification for a user.
    ///
    /// When `related_id` is given the new row is created already linked to
    /// the original action notification it reverses; the link target must
    /// exist and must not itself be a reversal (no chains deeper than 2).
    pub async fn create_moderation_notification(
        &self,
        notifiee_id: &str,
        notifier_id: Option<&str>,
        target_id: Option<&str>,
        body: &str,
        related_id: Option<&str>,
    ) -> AppResult<notification::Model> {
        if let Some(related) = related_id {
            self.validate_link_target(related).await?;
        }

        let id = self.id_gen.generate();
        let model = notification::ActiveModel {
            id: Set(id),
            notifiee_id: Set(notifiee_id.to_string()),
            notifier_id: Set(notifier_id.map(std::string::ToString::to_string)),
            notification_type: Set(NotificationType::Moderation),
            target_id: Set(target_id.map(std::string::ToString::to_string)),
            body: Set(Some(body.to_string())),
            related_notification_id: Set(related_id.map(std::string::ToString::to_string)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Link a reversal notification back to the original it reverses.
    ///
    /// Write-once: rejects self-links, reversals that already carry a link,
    /// and link targets that are themselves reversals.
    pub async fn link_reversal(
        &self,
        reversal_id: &str,
        original_id: &str,
    ) -> AppResult<notification::Model> {
        if reversal_id == original_id {
            return Err(AppError::Validation(
                "A notification cannot reference itself".to_string(),
            ));
        }

        let reversal = self.notification_repo.get_by_id(reversal_id).await?;
        if reversal.related_notification_id.is_some() {
            return Err(AppError::Validation(
                "Notification already references an original".to_string(),
            ));
        }

        let original = self.validate_link_target(original_id).await?;

        let mut model: notification::ActiveModel = reversal.into();
        model.related_notification_id = Set(Some(original.id));

        self.notification_repo.update(model).await
    }

    /// Get notifications for a user, newest first.
    pub async fn list_for_user(
        &self,
        notifiee_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_for_user(notifiee_id, limit, offset)
            .await
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, id: &str) -> AppResult<()> {
        self.notification_repo.mark_read(id).await
    }

    /// Find the newest moderation notification for a user that is not itself
    /// a reversal; used to anchor reversal linkage when lifting a suspension.
    pub async fn latest_moderation_for(
        &self,
        notifiee_id: &str,
    ) -> AppResult<Option<notification::Model>> {
        self.notification_repo
            .find_latest_moderation(notifiee_id)
            .await
    }

    async fn validate_link_target(&self, original_id: &str) -> AppResult<notification::Model> {
        let original = self.notification_repo.get_by_id(original_id).await?;
        if original.related_notification_id.is_some() {
            return Err(AppError::Validation(
                "Cannot link to a notification that is itself a reversal".to_string(),
            ));
        }
        Ok(original)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_notification(id: &str, related: Option<&str>) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            notifiee_id: "user1".to_string(),
            notifier_id: Some("mod1".to_string()),
            notification_type: NotificationType::Moderation,
            target_id: Some("action1".to_string()),
            body: Some("Your account has been suspended".to_string()),
            related_notification_id: related.map(std::string::ToString::to_string),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    fn service_with_results(
        results: Vec<Vec<notification::Model>>,
    ) -> NotificationService {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(results)
                .into_connection(),
        );
        NotificationService::new(NotificationRepository::new(db))
    }

    #[tokio::test]
    async fn test_link_reversal_rejects_self_link() {
        let service = service_with_results(vec![]);

        let result = service.link_reversal("notif1", "notif1").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_link_reversal_rejects_already_linked_reversal() {
        let service = service_with_results(vec![vec![create_test_notification(
            "notif2",
            Some("notif1"),
        )]]);

        let result = service.link_reversal("notif2", "notif3").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_link_reversal_rejects_chains() {
        let reversal = create_test_notification("notif3", None);
        // The proposed original is itself a reversal of notif1
        let original = create_test_notification("notif2", Some("notif1"));

        let service = service_with_results(vec![vec![reversal], vec![original]]);

        let result = service.link_reversal("notif3", "notif2").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_link_reversal_missing_original() {
        let reversal = create_test_notification("notif2", None);

        let service = service_with_results(vec![vec![reversal], vec![]]);

        let result = service.link_reversal("notif2", "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_link_reversal_writes_reference() {
        let reversal = create_test_notification("notif2", None);
        let original = create_test_notification("notif1", None);
        let linked = create_test_notification("notif2", Some("notif1"));

        let service =
            service_with_results(vec![vec![reversal], vec![original], vec![linked]]);

        let result = service.link_reversal("notif2", "notif1").await.unwrap();
        assert_eq!(
            result.related_notification_id,
            Some("notif1".to_string())
        );
    }
}
