//! Create role assignment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleAssignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleAssignment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoleAssignment::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoleAssignment::RoleType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoleAssignment::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RoleAssignment::GrantedBy).string_len(32))
                    .col(
                        ColumnDef::new(RoleAssignment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(RoleAssignment::RevokedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_assignment_user")
                            .from(RoleAssignment::Table, RoleAssignment::UserId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's assignments)
        manager
            .create_index(
                Index::create()
                    .name("idx_role_assignment_user_id")
                    .table(RoleAssignment::Table)
                    .col(RoleAssignment::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, role_type, is_active) (for capability checks)
        manager
            .create_index(
                Index::create()
                    .name("idx_role_assignment_user_role_active")
                    .table(RoleAssignment::Table)
                    .col(RoleAssignment::UserId)
                    .col(RoleAssignment::RoleType)
                    .col(RoleAssignment::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleAssignment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RoleAssignment {
    Table,
    Id,
    UserId,
    RoleType,
    IsActive,
    GrantedBy,
    CreatedAt,
    RevokedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
