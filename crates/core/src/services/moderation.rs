//! Moderation service: suspension orchestration, content deletion, report
//! handling, and the moderation ledger.
//!
//! The suspension path is the one place in the engine with real
//! state-machine semantics: a `(user, restriction type)` pair moves
//! Unrestricted -> Active-Restricted -> Expired/Reversed -> Unrestricted,
//! and re-suspension supersedes the prior restriction instead of stacking a
//! second one. Everything between marking the profile and writing the audit
//! entry runs on a single transaction.

use std::sync::Arc;

use chorus_common::{AppError, AppResult, IdGenerator, config::ModerationConfig};
use chorus_db::{
    entities::{
        audit_log,
        moderation_action::{self, ActionType, TargetType},
        moderation_report,
        user_restriction::{self, RestrictionType},
    },
    repositories::{
        AccountRepository, AuditLogRepository, ModerationActionRepository, ReportRepository,
        RestrictionRepository,
    },
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::services::authorization::{LogKind, PolicyService};
use crate::services::content::{ContentKind, ContentStoreService};
use crate::services::notification::NotificationService;

pub use chorus_db::entities::moderation_report::{ReportStatus, ReportType};

/// Input for suspending a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuspendUserInput {
    pub target_user_id: String,
    #[validate(length(max = 2000))]
    pub reason: String,
    /// Days the suspension lasts; None = permanent.
    pub duration_days: Option<i32>,
    /// Extend an existing suspension action in place instead of recording a
    /// new one.
    pub existing_action_id: Option<String>,
    /// Staff-only notes attached to the ledger entry.
    pub internal_notes: Option<String>,
}

/// Input for reporting a user or a piece of content.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    pub report_type: ReportType,
    pub target_id: String,
    #[validate(length(max = 2000))]
    pub comment: String,
}

/// Input for resolving a report.
pub struct ResolveReportInput {
    pub report_id: String,
    pub resolution: ReportStatus,
    pub comment: Option<String>,
}

/// What a successful suspension produced.
#[derive(Debug, Clone)]
pub struct SuspensionOutcome {
    /// The ledger entry (new, or updated in link mode).
    pub action: moderation_action::Model,
    /// The restriction row now in force.
    pub restriction: user_restriction::Model,
}

/// Moderation service composing the role registry, restriction store,
/// action ledger and audit log.
#[derive(Clone)]
pub struct ModerationService {
    db: Arc<DatabaseConnection>,
    policy: PolicyService,
    account_repo: AccountRepository,
    action_repo: ModerationActionRepository,
    restriction_repo: RestrictionRepository,
    report_repo: ReportRepository,
    audit_repo: AuditLogRepository,
    content_store: ContentStoreService,
    notifications: Option<NotificationService>,
    config: ModerationConfig,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        policy: PolicyService,
        account_repo: AccountRepository,
        action_repo: ModerationActionRepository,
        restriction_repo: RestrictionRepository,
        report_repo: ReportRepository,
        audit_repo: AuditLogRepository,
        content_store: ContentStoreService,
        config: ModerationConfig,
    ) -> Self {
        Self {
            db,
            policy,
            account_repo,
            action_repo,
            restriction_repo,
            report_repo,
            audit_repo,
            content_store,
            notifications: None,
            config,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification service (best-effort side channel).
    pub fn set_notification_service(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    // ========== User Suspensions ==========

    /// Suspend a user.
    ///
    /// Authorization, validation, the profile flag, the ledger entry, the
    /// restriction supersede and the (admin-only) audit entry run as one
    /// atomic unit; any failure aborts all of them. Re-suspending an
    /// already-suspended user succeeds and replaces the prior restriction.
    pub async fn suspend_user(
        &self,
        actor_id: &str,
        input: SuspendUserInput,
    ) -> AppResult<SuspensionOutcome> {
        // Authorization first: permanent suspensions are admin-only,
        // temporary ones need an active staff role, and a target holding an
        // active admin role is off-limits to everyone.
        let permanent = input.duration_days.is_none();
        let actor_roles = self.policy.authorize_suspension(actor_id, permanent).await?;
        self.policy
            .ensure_target_suspendable(&input.target_user_id)
            .await?;

        // Validation, before any mutation is attempted.
        input.validate()?;
        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "Suspension reason is required".to_string(),
            ));
        }
        if actor_id == input.target_user_id {
            return Err(AppError::Validation("Cannot suspend yourself".to_string()));
        }
        if let Some(days) = input.duration_days {
            if days < 1 || days > self.config.max_suspension_days {
                return Err(AppError::Validation(format!(
                    "Suspension duration must be between 1 and {} days",
                    self.config.max_suspension_days
                )));
            }
        }

        let expires_at = compute_expiry(input.duration_days);

        // Link mode resolves its ledger entry before anything is written.
        let existing_action = match &input.existing_action_id {
            Some(id) => {
                let action = self.action_repo.get_by_id(id).await?;
                if action.target_user_id != input.target_user_id {
                    return Err(AppError::Validation(
                        "Action does not belong to the target user".to_string(),
                    ));
                }
                if action.action_type != ActionType::UserSuspended {
                    return Err(AppError::Validation(
                        "Only suspension actions can be extended".to_string(),
                    ));
                }
                Some(action)
            }
            None => None,
        };

        let target = self.account_repo.get_by_id(&input.target_user_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.account_repo
            .set_suspension(&txn, &target.id, expires_at.map(Into::into), reason)
            .await?;

        let action = match existing_action {
            Some(existing) => {
                self.action_repo
                    .update_expiry(&txn, existing, expires_at.map(Into::into), input.duration_days)
                    .await?
            }
            None => {
                let model = moderation_action::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    moderator_id: Set(actor_id.to_string()),
                    target_user_id: Set(target.id.clone()),
                    action_type: Set(ActionType::UserSuspended),
                    target_type: Set(TargetType::User),
                    target_id: Set(target.id.clone()),
                    reason: Set(reason.to_string()),
                    duration_days: Set(input.duration_days),
                    expires_at: Set(expires_at.map(Into::into)),
                    internal_notes: Set(input.internal_notes.clone()),
                    notification_sent: Set(false),
                    created_at: Set(Utc::now().into()),
                };
                self.action_repo.create(&txn, model).await?
            }
        };

        // Deactivate-then-insert, on this same transaction. Skipping the
        // deactivation would break the at-most-one-active-restriction
        // invariant under concurrent re-suspension.
        let restriction_model = user_restriction::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(target.id.clone()),
            restriction_type: Set(RestrictionType::Suspended),
            expires_at: Set(expires_at.map(Into::into)),
            is_active: Set(true),
            reason: Set(reason.to_string()),
            applied_by: Set(actor_id.to_string()),
            related_action_id: Set(action.id.clone()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let restriction = self
            .restriction_repo
            .supersede(&txn, &target.id, RestrictionType::Suspended, restriction_model)
            .await?;

        // Moderators do not get audit-log write access; only admin-initiated
        // suspensions leave a trail.
        if actor_roles.is_admin {
            let entry = audit_log::ActiveModel {
                id: Set(self.id_gen.generate()),
                actor_id: Set(actor_id.to_string()),
                action_type: Set("user_suspended".to_string()),
                target_type: Set("user".to_string()),
                target_id: Set(target.id.clone()),
                payload: Set(json!({
                    "reason": reason,
                    "duration_days": input.duration_days,
                    "expires_at": expires_at,
                    "is_permanent": permanent,
                    "action_id": action.id,
                })),
                created_at: Set(Utc::now().into()),
            };
            self.audit_repo.log(&txn, entry).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            target_user = %target.id,
            moderator = %actor_id,
            permanent = permanent,
            "User suspended"
        );

        // Best-effort notification, outside the transaction.
        self.notify_suspension(actor_id, &target.id, &action.id, reason, expires_at)
            .await;

        Ok(SuspensionOutcome {
            action,
            restriction,
        })
    }

    /// Lift a user's active suspension.
    ///
    /// The restriction is deactivated and the account cleared on one
    /// transaction; the target then gets a reversal notification linked back
    /// to the original suspension notification when one exists.
    pub async fn lift_suspension(
        &self,
        actor_id: &str,
        target_user_id: &str,
        comment: Option<&str>,
    ) -> AppResult<moderation_action::Model> {
        let actor_roles = self.policy.require_staff(actor_id).await?;

        let restriction = self
            .restriction_repo
            .find_active(target_user_id, RestrictionType::Suspended)
            .await?
            .ok_or_else(|| AppError::NotFound("User is not suspended".to_string()))?;

        let reason = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Suspension lifted")
            .to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.restriction_repo.deactivate(&txn, &restriction.id).await?;
        self.account_repo.clear_suspension(&txn, target_user_id).await?;

        let model = moderation_action::ActiveModel {
            id: Set(self.id_gen.generate()),
            moderator_id: Set(actor_id.to_string()),
            target_user_id: Set(target_user_id.to_string()),
            action_type: Set(ActionType::SuspensionLifted),
            target_type: Set(TargetType::User),
            target_id: Set(target_user_id.to_string()),
            reason: Set(reason.clone()),
            duration_days: Set(None),
            expires_at: Set(None),
            internal_notes: Set(None),
            notification_sent: Set(false),
            created_at: Set(Utc::now().into()),
        };
        let action = self.action_repo.create(&txn, model).await?;

        if actor_roles.is_admin {
            let entry = audit_log::ActiveModel {
                id: Set(self.id_gen.generate()),
                actor_id: Set(actor_id.to_string()),
                action_type: Set("suspension_lifted".to_string()),
                target_type: Set("user".to_string()),
                target_id: Set(target_user_id.to_string()),
                payload: Set(json!({
                    "reason": reason,
                    "restriction_id": restriction.id,
                    "original_action_id": restriction.related_action_id,
                    "action_id": action.id,
                })),
                created_at: Set(Utc::now().into()),
            };
            self.audit_repo.log(&txn, entry).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(target_user = %target_user_id, moderator = %actor_id, "Suspension lifted");

        self.notify_reversal(actor_id, target_user_id, &action.id).await;

        Ok(action)
    }

    /// Check whether a user is currently suspended.
    pub async fn is_suspended(&self, user_id: &str) -> AppResult<bool> {
        Ok(self
            .restriction_repo
            .find_active(user_id, RestrictionType::Suspended)
            .await?
            .is_some())
    }

    /// Get the active restriction of a given type for a user.
    pub async fn active_restriction(
        &self,
        user_id: &str,
        restriction_type: RestrictionType,
    ) -> AppResult<Option<user_restriction::Model>> {
        self.restriction_repo
            .find_active(user_id, restriction_type)
            .await
    }

    /// Get the full restriction history for a user.
    pub async fn restriction_history(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<user_restriction::Model>> {
        self.restriction_repo.find_for_user(user_id).await
    }

    /// Get all active restrictions.
    pub async fn active_restrictions(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user_restriction::Model>> {
        self.restriction_repo.find_all_active(limit, offset).await
    }

    // ========== Content Deletion ==========

    /// Delete a post, comment or track.
    ///
    /// Permitted for active staff and for the content owner. Staff deletions
    /// of someone else's content get a ledger entry; that write is
    /// deliberately not atomic with the delete, because the content
    /// collaborator sits outside the engine's transaction boundary.
    pub async fn delete_content(
        &self,
        actor_id: &str,
        kind: ContentKind,
        content_id: &str,
        reason: &str,
    ) -> AppResult<()> {
        let owner = self
            .content_store
            .owner_of(kind, content_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("{} {content_id} not found", kind.as_str()))
            })?;

        let actor_roles = self
            .policy
            .authorize_content_delete(actor_id, Some(&owner))
            .await?;

        self.content_store.delete(kind, content_id).await?;

        tracing::info!(
            content_id = %content_id,
            kind = kind.as_str(),
            actor = %actor_id,
            "Content deleted"
        );

        if actor_roles.is_staff() && actor_id != owner {
            let reason = reason.trim();
            let model = moderation_action::ActiveModel {
                id: Set(self.id_gen.generate()),
                moderator_id: Set(actor_id.to_string()),
                target_user_id: Set(owner),
                action_type: Set(ActionType::ContentRemoved),
                target_type: Set(kind.target_type()),
                target_id: Set(content_id.to_string()),
                reason: Set(if reason.is_empty() {
                    "Content removed".to_string()
                } else {
                    reason.to_string()
                }),
                duration_days: Set(None),
                expires_at: Set(None),
                internal_notes: Set(None),
                notification_sent: Set(false),
                created_at: Set(Utc::now().into()),
            };

            // The content is already gone at this point; a failed ledger
            // write is surfaced but cannot undo the delete.
            if let Err(e) = self.action_repo.create(self.db.as_ref(), model).await {
                tracing::warn!(
                    error = %e,
                    content_id = %content_id,
                    "Failed to record content removal in the action ledger"
                );
                return Err(e);
            }
        }

        Ok(())
    }

    // ========== Reports ==========

    /// Check whether a report would be a duplicate: same reporter, type and
    /// target within the trailing window.
    ///
    /// Pure read. Two racing submissions can both pass this check; the
    /// window is a best-effort throttle, not a uniqueness constraint.
    pub async fn has_duplicate_report(
        &self,
        reporter_id: &str,
        report_type: ReportType,
        target_id: &str,
    ) -> AppResult<bool> {
        let cutoff = Utc::now() - Duration::hours(self.config.duplicate_report_window_hours);
        Ok(self
            .report_repo
            .find_recent_duplicate(reporter_id, report_type, target_id, cutoff)
            .await?
            .is_some())
    }

    /// Submit a report.
    pub async fn create_report(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<moderation_report::Model> {
        input.validate()?;
        let comment = input.comment.trim();
        if comment.is_empty() {
            return Err(AppError::Validation(
                "Report comment is required".to_string(),
            ));
        }
        if input.report_type == ReportType::User && input.target_id == reporter_id {
            return Err(AppError::Validation("Cannot report yourself".to_string()));
        }

        if self
            .has_duplicate_report(reporter_id, input.report_type, &input.target_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "An identical report was already submitted within the last {} hours",
                self.config.duplicate_report_window_hours
            )));
        }

        let model = moderation_report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            report_type: Set(input.report_type),
            target_id: Set(input.target_id),
            comment: Set(comment.to_string()),
            status: Set(ReportStatus::Pending),
            assignee_id: Set(None),
            resolution_comment: Set(None),
            created_at: Set(Utc::now().into()),
            resolved_at: Set(None),
        };

        self.report_repo.create(model).await
    }

    /// Resolve a report.
    pub async fn resolve_report(
        &self,
        moderator_id: &str,
        input: ResolveReportInput,
    ) -> AppResult<moderation_report::Model> {
        self.policy.require_staff(moderator_id).await?;

        if input.resolution == ReportStatus::Pending {
            return Err(AppError::Validation(
                "Cannot set report back to pending".to_string(),
            ));
        }

        let report = self.report_repo.get_by_id(&input.report_id).await?;
        if report.status != ReportStatus::Pending {
            return Err(AppError::Conflict("Report already resolved".to_string()));
        }

        let mut model: moderation_report::ActiveModel = report.into();
        model.status = Set(input.resolution);
        model.assignee_id = Set(Some(moderator_id.to_string()));
        model.resolution_comment = Set(input.comment);
        model.resolved_at = Set(Some(Utc::now().into()));

        self.report_repo.update(model).await
    }

    /// Get pending reports.
    pub async fn pending_reports(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_report::Model>> {
        self.report_repo.find_pending(limit, offset).await
    }

    /// Count pending reports.
    pub async fn count_pending_reports(&self) -> AppResult<u64> {
        self.report_repo.count_pending().await
    }

    /// Get reports against a specific target (cross-user view); admin only.
    pub async fn reports_for_target(
        &self,
        actor_id: &str,
        report_type: ReportType,
        target_id: &str,
        limit: u64,
    ) -> AppResult<Vec<moderation_report::Model>> {
        self.policy
            .authorize_log_view(actor_id, LogKind::Audit)
            .await?;
        self.report_repo
            .find_for_target(report_type, target_id, limit)
            .await
    }

    // ========== Logs ==========

    /// Recent moderation activity (operational log); open to any
    /// authenticated principal.
    pub async fn recent_actions(
        &self,
        actor_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_action::Model>> {
        self.policy
            .authorize_log_view(actor_id, LogKind::Operational)
            .await?;
        self.action_repo.find_recent(limit, offset).await
    }

    /// Actions taken against one user (cross-user activity summary);
    /// admin only.
    pub async fn actions_for_user(
        &self,
        actor_id: &str,
        target_user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<moderation_action::Model>> {
        self.policy
            .authorize_log_view(actor_id, LogKind::Audit)
            .await?;
        self.action_repo.find_for_user(target_user_id, limit).await
    }

    /// The sensitive audit trail; admin only.
    pub async fn audit_entries(
        &self,
        actor_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        self.policy
            .authorize_log_view(actor_id, LogKind::Audit)
            .await?;
        self.audit_repo.find_recent(limit, offset).await
    }

    // ========== Internal helpers ==========

    async fn notify_suspension(
        &self,
        actor_id: &str,
        target_user_id: &str,
        action_id: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let Some(notifications) = self.notifications.as_ref() else {
            return;
        };

        let body = match expires_at {
            Some(until) => format!(
                "Your account has been suspended until {}: {reason}",
                until.format("%Y-%m-%d")
            ),
            None => format!("Your account has been suspended: {reason}"),
        };

        match notifications
            .create_moderation_notification(
                target_user_id,
                Some(actor_id),
                Some(action_id),
                &body,
                None,
            )
            .await
        {
            Ok(_) => {
                if let Err(e) = self.action_repo.mark_notification_sent(action_id).await {
                    tracing::warn!(error = %e, action_id = %action_id, "Failed to flag notification as sent");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, target_user = %target_user_id, "Failed to create suspension notification");
            }
        }
    }

    async fn notify_reversal(&self, actor_id: &str, target_user_id: &str, action_id: &str) {
        let Some(notifications) = self.notifications.as_ref() else {
            return;
        };

        // Anchor the reversal to the original suspension notification when
        // one exists; otherwise the reversal goes out unlinked.
        let related = match notifications.latest_moderation_for(target_user_id).await {
            Ok(original) => original.map(|n| n.id),
            Err(e) => {
                tracing::warn!(error = %e, target_user = %target_user_id, "Failed to look up original notification");
                None
            }
        };

        match notifications
            .create_moderation_notification(
                target_user_id,
                Some(actor_id),
                Some(action_id),
                "Your account suspension has been lifted",
                related.as_deref(),
            )
            .await
        {
            Ok(_) => {
                if let Err(e) = self.action_repo.mark_notification_sent(action_id).await {
                    tracing::warn!(error = %e, action_id = %action_id, "Failed to flag notification as sent");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, target_user = %target_user_id, "Failed to create reversal notification");
            }
        }
    }
}

/// Compute a suspension expiry from an optional duration in days.
fn compute_expiry(duration_days: Option<i32>) -> Option<DateTime<Utc>> {
    duration_days.map(|days| Utc::now() + Duration::days(i64::from(days)))
}
