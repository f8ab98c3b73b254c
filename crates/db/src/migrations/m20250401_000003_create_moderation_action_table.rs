//! Create moderation action table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationAction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationAction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::ModeratorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::TargetUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::ActionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::TargetType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::TargetId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ModerationAction::Reason).text().not_null())
                    .col(ColumnDef::new(ModerationAction::DurationDays).integer())
                    .col(ColumnDef::new(ModerationAction::ExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ModerationAction::InternalNotes).text())
                    .col(
                        ColumnDef::new(ModerationAction::NotificationSent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_action_moderator")
                            .from(ModerationAction::Table, ModerationAction::ModeratorId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_action_target_user")
                            .from(ModerationAction::Table, ModerationAction::TargetUserId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: target_user_id (for per-user activity summaries)
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_action_target_user_id")
                    .table(ModerationAction::Table)
                    .col(ModerationAction::TargetUserId)
                    .to_owned(),
            )
            .await?;

        // Index: moderator_id (for per-moderator listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_action_moderator_id")
                    .table(ModerationAction::Table)
                    .col(ModerationAction::ModeratorId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for pagination)
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_action_created_at")
                    .table(ModerationAction::Table)
                    .col(ModerationAction::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationAction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModerationAction {
    Table,
    Id,
    ModeratorId,
    TargetUserId,
    ActionType,
    TargetType,
    TargetId,
    Reason,
    DurationDays,
    ExpiresAt,
    InternalNotes,
    NotificationSent,
    CreatedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
