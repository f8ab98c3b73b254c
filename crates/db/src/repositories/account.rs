//! Account repository.

use std::sync::Arc;

use crate::entities::{Account, account};
use chorus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// Account repository for database operations.
#[derive(Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<account::Model>> {
        Account::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<account::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Create a new account.
    pub async fn create(&self, model: account::ActiveModel) -> AppResult<account::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark an account as suspended (single UPDATE query, no fetch).
    ///
    /// Runs against the caller's connection so it can participate in the
    /// suspension transaction.
    pub async fn set_suspension<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        expires_at: Option<DateTimeWithTimeZone>,
        reason: &str,
    ) -> AppResult<()> {
        let result = Account::update_many()
            .col_expr(account::Column::IsSuspended, Expr::value(true))
            .col_expr(account::Column::SuspendedUntil, Expr::value(expires_at))
            .col_expr(
                account::Column::SuspensionReason,
                Expr::value(Some(reason.to_string())),
            )
            .col_expr(
                account::Column::UpdatedAt,
                Expr::value(Some(DateTimeWithTimeZone::from(chrono::Utc::now()))),
            )
            .filter(account::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        Ok(())
    }

    /// Clear an account's suspension state (single UPDATE query, no fetch).
    pub async fn clear_suspension<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> AppResult<()> {
        let result = Account::update_many()
            .col_expr(account::Column::IsSuspended, Expr::value(false))
            .col_expr(
                account::Column::SuspendedUntil,
                Expr::value(None::<DateTimeWithTimeZone>),
            )
            .col_expr(
                account::Column::SuspensionReason,
                Expr::value(None::<String>),
            )
            .col_expr(
                account::Column::UpdatedAt,
                Expr::value(Some(DateTimeWithTimeZone::from(chrono::Utc::now()))),
            )
            .filter(account::Column::Id.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_account(id: &str, username: &str) -> account::Model {
        account::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            name: None,
            is_suspended: false,
            suspended_until: None,
            suspension_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<account::Model>::new()])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let account = create_test_account("user1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[account]])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.get_by_id("user1").await.unwrap();

        assert_eq!(result.username, "alice");
    }

    #[tokio::test]
    async fn test_set_suspension_missing_account() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = AccountRepository::new(db.clone());
        let result = repo
            .set_suspension(db.as_ref(), "missing", None, "spam")
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
