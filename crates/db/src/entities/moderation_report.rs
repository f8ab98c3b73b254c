//! Moderation report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of entity a report targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ReportType {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "post")]
    Post,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "track")]
    Track,
}

/// Report status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Moderation report model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The user who submitted the report.
    pub reporter_id: String,
    /// What kind of entity is being reported.
    pub report_type: ReportType,
    /// ID of the reported entity.
    pub target_id: String,
    /// Reason for the report.
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    /// Current status of the report.
    pub status: ReportStatus,
    /// Staff member who handled the report.
    #[sea_orm(nullable)]
    pub assignee_id: Option<String>,
    /// Resolution comment by the handling staff member.
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_comment: Option<String>,
    /// When the report was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the report was resolved.
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::ReporterId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Reporter,
}

impl ActiveModelBehavior for ActiveModel {}
