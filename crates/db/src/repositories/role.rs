//! Role assignment repository.
//!
//! Read-only from the engine's perspective: role grants and revocations are
//! performed by external administration tooling. Every lookup reads whatever
//! committed state exists at call time; nothing is cached across calls.

use std::sync::Arc;

use crate::entities::{
    RoleAssignment,
    role_assignment::{self, RoleType},
};
use chorus_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Role assignment repository for database operations.
#[derive(Clone)]
pub struct RoleRepository {
    db: Arc<DatabaseConnection>,
}

impl RoleRepository {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get all active role assignments for a user.
    ///
    /// A user may hold zero rows, one row per role, or (historically)
    /// multiple rows for the same role; callers must tolerate all three.
    pub async fn active_assignments(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<role_assignment::Model>> {
        RoleAssignment::find()
            .filter(role_assignment::Column::UserId.eq(user_id))
            .filter(role_assignment::Column::IsActive.eq(true))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the distinct active role types held by a user.
    pub async fn active_role_types(&self, user_id: &str) -> AppResult<Vec<RoleType>> {
        let mut types: Vec<RoleType> = Vec::new();
        for assignment in self.active_assignments(user_id).await? {
            if !types.contains(&assignment.role_type) {
                types.push(assignment.role_type);
            }
        }
        Ok(types)
    }

    /// Check whether a user holds a specific active role.
    pub async fn has_active_role(&self, user_id: &str, role: RoleType) -> AppResult<bool> {
        let found = RoleAssignment::find()
            .filter(role_assignment::Column::UserId.eq(user_id))
            .filter(role_assignment::Column::RoleType.eq(role))
            .filter(role_assignment::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }
}
