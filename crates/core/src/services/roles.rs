//! Role registry service.
//!
//! The single injectable seam for capability checks: every operation that
//! cares about `admin` or `moderator` goes through here instead of doing its
//! own role lookups.

use chorus_common::AppResult;
use chorus_db::{entities::role_assignment::RoleType, repositories::RoleRepository};

/// Resolved active roles for a principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorRoles {
    /// Holds an active admin role.
    pub is_admin: bool,
    /// Holds an active moderator role.
    pub is_moderator: bool,
}

impl ActorRoles {
    /// Whether the principal holds any staff role.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        self.is_admin || self.is_moderator
    }
}

/// Role registry - resolves whether a principal holds an active staff role.
///
/// Pure reads. Role grants are mutated by external administration tooling;
/// each call here observes whatever committed state exists at call time, and
/// nothing is cached across authorization decisions.
#[derive(Clone)]
pub struct RoleService {
    role_repo: RoleRepository,
}

impl RoleService {
    /// Create a new role service.
    #[must_use]
    pub const fn new(role_repo: RoleRepository) -> Self {
        Self { role_repo }
    }

    /// Resolve all active roles for a principal with a single lookup.
    pub async fn roles_of(&self, user_id: &str) -> AppResult<ActorRoles> {
        let types = self.role_repo.active_role_types(user_id).await?;
        Ok(ActorRoles {
            is_admin: types.contains(&RoleType::Admin),
            is_moderator: types.contains(&RoleType::Moderator),
        })
    }

    /// Check whether a principal holds an active admin role.
    pub async fn is_admin(&self, user_id: &str) -> AppResult<bool> {
        self.role_repo
            .has_active_role(user_id, RoleType::Admin)
            .await
    }

    /// Check whether a principal holds an active moderator role.
    pub async fn is_moderator(&self, user_id: &str) -> AppResult<bool> {
        self.role_repo
            .has_active_role(user_id, RoleType::Moderator)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chorus_db::entities::role_assignment;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_assignment(id: &str, user_id: &str, role: RoleType) -> role_assignment::Model {
        role_assignment::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            role_type: role,
            is_active: true,
            granted_by: None,
            created_at: Utc::now().into(),
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn test_roles_of_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_assignment("role1", "user1", RoleType::Admin)]])
                .into_connection(),
        );

        let service = RoleService::new(RoleRepository::new(db));
        let roles = service.roles_of("user1").await.unwrap();

        assert!(roles.is_admin);
        assert!(!roles.is_moderator);
        assert!(roles.is_staff());
    }

    #[tokio::test]
    async fn test_roles_of_without_assignments() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<role_assignment::Model>::new()])
                .into_connection(),
        );

        let service = RoleService::new(RoleRepository::new(db));
        let roles = service.roles_of("user1").await.unwrap();

        assert!(!roles.is_admin);
        assert!(!roles.is_moderator);
        assert!(!roles.is_staff());
    }

    #[tokio::test]
    async fn test_roles_of_holding_both() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_assignment("role1", "user1", RoleType::Moderator),
                    create_test_assignment("role2", "user1", RoleType::Admin),
                ]])
                .into_connection(),
        );

        let service = RoleService::new(RoleRepository::new(db));
        let roles = service.roles_of("user1").await.unwrap();

        assert!(roles.is_admin);
        assert!(roles.is_moderator);
    }
}
