//! Role assignment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff role types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RoleType {
    #[sea_orm(string_value = "moderator")]
    Moderator,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Role assignment model - a grant of moderator or admin capability to a
/// user. Rows are created and revoked by administration tooling; the
/// moderation engine only reads them. Historical (inactive) rows are kept,
/// and a user may hold zero or multiple rows per role type.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "role_assignment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The user holding the role.
    pub user_id: String,
    /// Which role is granted.
    pub role_type: RoleType,
    /// Whether the grant is currently in force.
    pub is_active: bool,
    /// Who granted the role.
    #[sea_orm(nullable)]
    pub granted_by: Option<String>,
    /// When the role was granted.
    pub created_at: DateTimeWithTimeZone,
    /// When the role was revoked (if revoked).
    #[sea_orm(nullable)]
    pub revoked_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::UserId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
