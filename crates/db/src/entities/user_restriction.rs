//! User restriction entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Standing limitations that can be applied to an account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RestrictionType {
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "silenced")]
    Silenced,
}

/// User restriction model - tracks per-user active restrictions.
///
/// Invariant: at most one row with `is_active = true` per
/// `(user_id, restriction_type)` at any instant. Rows are superseded, never
/// hard-deleted: applying a new restriction of the same type deactivates the
/// prior active row in the same transaction that inserts the new one.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_restriction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The restricted user.
    pub user_id: String,
    /// What kind of restriction this is.
    pub restriction_type: RestrictionType,
    /// When the restriction expires (None = permanent).
    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,
    /// Whether this row is the restriction currently in force.
    pub is_active: bool,
    /// Reason for the restriction.
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    /// The staff member who applied the restriction.
    pub applied_by: String,
    /// The moderation action this restriction was created from.
    pub related_action_id: String,
    /// When the restriction was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the restriction was last transitioned (deactivated).
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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

    #[sea_orm(
        belongs_to = "super::moderation_action::Entity",
        from = "Column::RelatedActionId",
        to = "super::moderation_action::Column::Id"
    )]
    RelatedAction,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::moderation_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RelatedAction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
