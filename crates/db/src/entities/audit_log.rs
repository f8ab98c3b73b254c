//! Audit log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit log model - the sensitive trail of admin-initiated moderation
/// operations. Append-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The admin who performed the operation.
    pub actor_id: String,
    /// What was done (e.g. `user_suspended`).
    pub action_type: String,
    /// What kind of thing was acted on.
    pub target_type: String,
    /// ID of the acted-on entity.
    pub target_id: String,
    /// Operation parameters (reason, duration, expiry, linked action).
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,
    /// When the entry was written.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
