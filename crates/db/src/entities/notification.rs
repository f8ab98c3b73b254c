//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum NotificationType {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "follow")]
    Follow,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "mention")]
    Mention,
    #[sea_orm(string_value = "system")]
    System,
    #[sea_orm(string_value = "moderation")]
    Moderation,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user receiving the notification
    pub notifiee_id: String,

    /// The user who triggered the notification (optional for some types)
    #[sea_orm(nullable)]
    pub notifier_id: Option<String>,

    /// Notification type
    pub notification_type: NotificationType,

    /// Related entity ID (post, comment, track, moderation action)
    #[sea_orm(nullable)]
    pub target_id: Option<String>,

    /// Human-readable body text
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,

    /// Back-reference from a reversal notification to the original action
    /// notification it reverses. Written once at creation, never retro-edited;
    /// a notification must not reference itself, and the referenced
    /// notification must not itself carry a reference (no chains).
    #[sea_orm(nullable)]
    pub related_notification_id: Option<String>,

    /// Has this notification been read?
    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::NotifieeId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Notifiee,

    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::NotifierId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Notifier,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::RelatedNotificationId",
        to = "Column::Id"
    )]
    RelatedNotification,
}

impl ActiveModelBehavior for ActiveModel {}
