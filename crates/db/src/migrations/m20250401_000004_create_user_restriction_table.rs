//! Create user restriction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserRestriction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserRestriction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserRestriction::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRestriction::RestrictionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserRestriction::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(UserRestriction::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserRestriction::Reason).text().not_null())
                    .col(
                        ColumnDef::new(UserRestriction::AppliedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRestriction::RelatedActionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserRestriction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserRestriction::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_restriction_user")
                            .from(UserRestriction::Table, UserRestriction::UserId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_restriction_related_action")
                            .from(UserRestriction::Table, UserRestriction::RelatedActionId)
                            .to(ModerationAction::Table, ModerationAction::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, restriction_type, is_active) (for active lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_restriction_user_type_active")
                    .table(UserRestriction::Table)
                    .col(UserRestriction::UserId)
                    .col(UserRestriction::RestrictionType)
                    .col(UserRestriction::IsActive)
                    .to_owned(),
            )
            .await?;

        // Partial unique index backing the at-most-one-active-restriction
        // invariant. sea-query's index builder cannot express a WHERE clause,
        // so this one is raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX \"uq_user_restriction_active\" \
                 ON \"user_restriction\" (\"user_id\", \"restriction_type\") \
                 WHERE \"is_active\"",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRestriction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserRestriction {
    Table,
    Id,
    UserId,
    RestrictionType,
    ExpiresAt,
    IsActive,
    Reason,
    AppliedBy,
    RelatedActionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}

#[derive(Iden)]
enum ModerationAction {
    Table,
    Id,
}
