//! Moderation action entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinds of moderation decisions recorded in the ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ActionType {
    #[sea_orm(string_value = "user_suspended")]
    UserSuspended,
    #[sea_orm(string_value = "suspension_lifted")]
    SuspensionLifted,
    #[sea_orm(string_value = "content_removed")]
    ContentRemoved,
}

/// What a moderation action was taken against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TargetType {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "track")]
    Track,
}

/// Moderation action model - the append-mostly ledger of every moderation
/// decision. Identity, moderator and target are immutable after creation;
/// only `expires_at`/`duration_days` may be updated when an existing action
/// is extended rather than duplicated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_action")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The staff member who took the action.
    pub moderator_id: String,
    /// The user the action was taken against (content owner for removals).
    pub target_user_id: String,
    /// What was done.
    pub action_type: ActionType,
    /// What kind of thing was acted on.
    pub target_type: TargetType,
    /// ID of the acted-on entity (user id, post id, ...).
    pub target_id: String,
    /// Reason given by the moderator.
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    /// Duration in days for time-bounded actions (None = permanent).
    #[sea_orm(nullable)]
    pub duration_days: Option<i32>,
    /// When the action's effect expires (None = permanent).
    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,
    /// Staff-only notes, never shown to the target.
    #[sea_orm(column_type = "Text", nullable)]
    pub internal_notes: Option<String>,
    /// Whether the target has been notified about this action.
    #[sea_orm(default_value = false)]
    pub notification_sent: bool,
    /// When the action was taken.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::ModeratorId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Moderator,

    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::TargetUserId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    TargetUser,
}

impl ActiveModelBehavior for ActiveModel {}
