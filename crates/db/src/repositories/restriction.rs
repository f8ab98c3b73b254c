//! User restriction repository.
//!
//! Guards the central invariant: at most one active restriction per
//! `(user_id, restriction_type)`. All writes that could violate it go
//! through [`RestrictionRepository::supersede`], which runs on the caller's
//! transaction so the deactivate and insert commit or abort together.

use std::sync::Arc;

use crate::entities::{
    UserRestriction,
    user_restriction::{self, RestrictionType},
};
use chorus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};

/// User restriction repository for database operations.
#[derive(Clone)]
pub struct RestrictionRepository {
    db: Arc<DatabaseConnection>,
}

impl RestrictionRepository {
    /// Create a new restriction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Replace the active restriction of the given type for a user.
    ///
    /// Deactivates any currently-active row for `(user_id, restriction_type)`
    /// and then inserts `model` as the new active row. The deactivate must
    /// precede the insert; running both on one transaction plus the partial
    /// unique index on the table keeps concurrent callers from leaving two
    /// active rows behind.
    pub async fn supersede<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        restriction_type: RestrictionType,
        model: user_restriction::ActiveModel,
    ) -> AppResult<user_restriction::Model> {
        self.deactivate_active(conn, user_id, restriction_type)
            .await?;

        // The deactivate above must have cleared the slot; anything still
        // active here means the invariant is already broken and the whole
        // transaction has to abort rather than stack another active row.
        let remaining = self
            .count_active(conn, user_id, restriction_type)
            .await?;
        if remaining > 0 {
            return Err(AppError::Consistency(format!(
                "{remaining} active restriction(s) remain for user {user_id} after deactivation"
            )));
        }

        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Deactivate the active restriction rows of one type for a user.
    ///
    /// Returns the number of rows deactivated (0 when the user was
    /// unrestricted, 1 in the normal supersede case).
    pub async fn deactivate_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        restriction_type: RestrictionType,
    ) -> AppResult<u64> {
        let result = UserRestriction::update_many()
            .col_expr(user_restriction::Column::IsActive, Expr::value(false))
            .col_expr(
                user_restriction::Column::UpdatedAt,
                Expr::value(Some(DateTimeWithTimeZone::from(chrono::Utc::now()))),
            )
            .filter(user_restriction::Column::UserId.eq(user_id))
            .filter(user_restriction::Column::RestrictionType.eq(restriction_type))
            .filter(user_restriction::Column::IsActive.eq(true))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count active restriction rows of one type for a user.
    pub async fn count_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        restriction_type: RestrictionType,
    ) -> AppResult<u64> {
        UserRestriction::find()
            .filter(user_restriction::Column::UserId.eq(user_id))
            .filter(user_restriction::Column::RestrictionType.eq(restriction_type))
            .filter(user_restriction::Column::IsActive.eq(true))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the active, unexpired restriction of one type for a user.
    pub async fn find_active(
        &self,
        user_id: &str,
        restriction_type: RestrictionType,
    ) -> AppResult<Option<user_restriction::Model>> {
        let now = chrono::Utc::now();

        UserRestriction::find()
            .filter(user_restriction::Column::UserId.eq(user_id))
            .filter(user_restriction::Column::RestrictionType.eq(restriction_type))
            .filter(user_restriction::Column::IsActive.eq(true))
            .filter(
                user_restriction::Column::ExpiresAt
                    .is_null()
                    .or(user_restriction::Column::ExpiresAt.gt(now)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the full restriction history for a user, newest first.
    pub async fn find_for_user(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<user_restriction::Model>> {
        UserRestriction::find()
            .filter(user_restriction::Column::UserId.eq(user_id))
            .order_by_desc(user_restriction::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all active, unexpired restrictions.
    pub async fn find_all_active(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user_restriction::Model>> {
        let now = chrono::Utc::now();

        UserRestriction::find()
            .filter(user_restriction::Column::IsActive.eq(true))
            .filter(
                user_restriction::Column::ExpiresAt
                    .is_null()
                    .or(user_restriction::Column::ExpiresAt.gt(now)),
            )
            .order_by_desc(user_restriction::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Deactivate a single restriction row by ID (used when lifting).
    pub async fn deactivate<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        let result = UserRestriction::update_many()
            .col_expr(user_restriction::Column::IsActive, Expr::value(false))
            .col_expr(
                user_restriction::Column::UpdatedAt,
                Expr::value(Some(DateTimeWithTimeZone::from(chrono::Utc::now()))),
            )
            .filter(user_restriction::Column::Id.eq(id))
            .filter(user_restriction::Column::IsActive.eq(true))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "Active restriction {id} not found"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

    fn create_test_restriction(id: &str, user_id: &str) -> user_restriction::Model {
        user_restriction::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            restriction_type: RestrictionType::Suspended,
            expires_at: None,
            is_active: true,
            reason: "Repeated violations".to_string(),
            applied_by: "mod1".to_string(),
            related_action_id: "action1".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn active_model_from(model: &user_restriction::Model) -> user_restriction::ActiveModel {
        user_restriction::ActiveModel {
            id: Set(model.id.clone()),
            user_id: Set(model.user_id.clone()),
            restriction_type: Set(model.restriction_type),
            expires_at: Set(model.expires_at),
            is_active: Set(model.is_active),
            reason: Set(model.reason.clone()),
            applied_by: Set(model.applied_by.clone()),
            related_action_id: Set(model.related_action_id.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }

    #[tokio::test]
    async fn test_supersede_deactivates_then_inserts() {
        let new_row = create_test_restriction("restriction2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // deactivate_active UPDATE hits the prior active row
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // post-deactivate count, then the INSERT .. RETURNING row
                .append_query_results([vec![
                    btreemap! { "num_items" => Value::BigInt(Some(0)) },
                ]])
                .append_query_results([[new_row.clone()]])
                .into_connection(),
        );

        let repo = RestrictionRepository::new(db.clone());
        let result = repo
            .supersede(
                db.as_ref(),
                "user1",
                RestrictionType::Suspended,
                active_model_from(&new_row),
            )
            .await
            .unwrap();

        assert_eq!(result.id, "restriction2");
        assert!(result.is_active);
    }

    #[tokio::test]
    async fn test_supersede_aborts_on_lingering_active_row() {
        let new_row = create_test_restriction("restriction2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([vec![
                    btreemap! { "num_items" => Value::BigInt(Some(1)) },
                ]])
                .into_connection(),
        );

        let repo = RestrictionRepository::new(db.clone());
        let result = repo
            .supersede(
                db.as_ref(),
                "user1",
                RestrictionType::Suspended,
                active_model_from(&new_row),
            )
            .await;

        assert!(matches!(result, Err(AppError::Consistency(_))));
    }

    #[tokio::test]
    async fn test_find_active_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_restriction::Model>::new()])
                .into_connection(),
        );

        let repo = RestrictionRepository::new(db);
        let result = repo
            .find_active("user1", RestrictionType::Suspended)
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
