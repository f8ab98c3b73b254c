//! Authorization policy layer.
//!
//! One declarative rule per `(actor role, action, target type)` combination,
//! consulted by every mutating or sensitive read operation. Evaluation is
//! synchronous and completes before any mutation begins; a failed rule
//! surfaces as [`AppError::Forbidden`] and nothing is partially applied.

use chorus_common::{AppError, AppResult};

use crate::services::roles::{ActorRoles, RoleService};

/// Log categories with distinct visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Operational logs (recent moderation activity); visible to any
    /// authenticated principal.
    Operational,
    /// Sensitive audit trails and cross-user activity summaries; admin only.
    Audit,
}

/// Policy evaluator for moderation operations.
#[derive(Clone)]
pub struct PolicyService {
    roles: RoleService,
}

impl PolicyService {
    /// Create a new policy service.
    #[must_use]
    pub const fn new(roles: RoleService) -> Self {
        Self { roles }
    }

    /// Require any active staff role (moderator or admin).
    pub async fn require_staff(&self, actor_id: &str) -> AppResult<ActorRoles> {
        let roles = self.roles.roles_of(actor_id).await?;
        if !roles.is_staff() {
            return Err(AppError::Forbidden(
                "Only moderators can perform this action".to_string(),
            ));
        }
        Ok(roles)
    }

    /// Authorize a suspension attempt.
    ///
    /// Permanent suspensions (no duration) are admin-only; temporary ones
    /// need an active moderator or admin role.
    pub async fn authorize_suspension(
        &self,
        actor_id: &str,
        permanent: bool,
    ) -> AppResult<ActorRoles> {
        if permanent {
            let roles = self.roles.roles_of(actor_id).await?;
            if !roles.is_admin {
                return Err(AppError::Forbidden(
                    "Only admins can permanently suspend users".to_string(),
                ));
            }
            return Ok(roles);
        }

        self.require_staff(actor_id).await
    }

    /// Target-is-admin guard: no actor, regardless of role, may suspend a
    /// principal holding an active admin role.
    pub async fn ensure_target_suspendable(&self, target_user_id: &str) -> AppResult<()> {
        if self.roles.is_admin(target_user_id).await? {
            return Err(AppError::Forbidden("Cannot suspend an admin".to_string()));
        }
        Ok(())
    }

    /// Content deletion: active staff, or the content owner.
    ///
    /// Ownership resolution is the content collaborator's job; the resolved
    /// owner (if any) is passed in.
    pub async fn authorize_content_delete(
        &self,
        actor_id: &str,
        owner_id: Option<&str>,
    ) -> AppResult<ActorRoles> {
        let roles = self.roles.roles_of(actor_id).await?;
        if roles.is_staff() || owner_id == Some(actor_id) {
            return Ok(roles);
        }

        Err(AppError::Forbidden(
            "Cannot delete other user's content".to_string(),
        ))
    }

    /// Log visibility rules.
    pub async fn authorize_log_view(&self, actor_id: &str, kind: LogKind) -> AppResult<()> {
        match kind {
            LogKind::Operational => Ok(()),
            LogKind::Audit => {
                if self.roles.is_admin(actor_id).await? {
                    Ok(())
                } else {
                    Err(AppError::Forbidden(
                        "Audit logs are restricted to admins".to_string(),
                    ))
                }
            }
        }
    }
}
