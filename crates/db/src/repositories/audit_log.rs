//! Audit log repository.

use std::sync::Arc;

use crate::entities::{AuditLog, audit_log};
use chorus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Audit log repository for database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an entry on the caller's connection.
    pub async fn log<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: audit_log::ActiveModel,
    ) -> AppResult<audit_log::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get recent entries, newest first.
    pub async fn find_recent(&self, limit: u64, offset: u64) -> AppResult<Vec<audit_log::Model>> {
        AuditLog::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get entries written by a specific actor, newest first.
    pub async fn find_for_actor(
        &self,
        actor_id: &str,
        limit: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        AuditLog::find()
            .filter(audit_log::Column::ActorId.eq(actor_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
