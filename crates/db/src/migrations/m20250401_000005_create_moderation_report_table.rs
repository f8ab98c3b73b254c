//! Create moderation report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationReport::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::ReporterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::ReportType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::TargetId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ModerationReport::Comment).text().not_null())
                    .col(
                        ColumnDef::new(ModerationReport::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ModerationReport::AssigneeId).string_len(32))
                    .col(ColumnDef::new(ModerationReport::ResolutionComment).text())
                    .col(
                        ColumnDef::new(ModerationReport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ModerationReport::ResolvedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_report_reporter")
                            .from(ModerationReport::Table, ModerationReport::ReporterId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (reporter_id, report_type, target_id, created_at) - the
        // duplicate-report guard's access path; the newest matching row
        // decides, in bounded time, regardless of report volume.
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_report_dedup")
                    .table(ModerationReport::Table)
                    .col(ModerationReport::ReporterId)
                    .col(ModerationReport::ReportType)
                    .col(ModerationReport::TargetId)
                    .col(ModerationReport::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: status (for the pending-report queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_report_status")
                    .table(ModerationReport::Table)
                    .col(ModerationReport::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationReport::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModerationReport {
    Table,
    Id,
    ReporterId,
    ReportType,
    TargetId,
    Comment,
    Status,
    AssigneeId,
    ResolutionComment,
    CreatedAt,
    ResolvedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
