//! Account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform account model - the profile store the moderation engine writes
/// suspension state into.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Is this account suspended?
    #[sea_orm(default_value = false)]
    pub is_suspended: bool,

    /// When the current suspension expires (None = permanent or not suspended)
    #[sea_orm(nullable)]
    pub suspended_until: Option<DateTimeWithTimeZone>,

    /// Reason shown for the current suspension
    #[sea_orm(column_type = "Text", nullable)]
    pub suspension_reason: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_assignment::Entity")]
    RoleAssignments,

    #[sea_orm(has_many = "super::user_restriction::Entity")]
    Restrictions,
}

impl Related<super::role_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleAssignments.def()
    }
}

impl Related<super::user_restriction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restrictions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
