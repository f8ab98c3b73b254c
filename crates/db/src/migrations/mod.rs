//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250401_000001_create_account_table;
mod m20250401_000002_create_role_assignment_table;
mod m20250401_000003_create_moderation_action_table;
mod m20250401_000004_create_user_restriction_table;
mod m20250401_000005_create_moderation_report_table;
mod m20250401_000006_create_notification_table;
mod m20250401_000007_create_audit_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_account_table::Migration),
            Box::new(m20250401_000002_create_role_assignment_table::Migration),
            Box::new(m20250401_000003_create_moderation_action_table::Migration),
            Box::new(m20250401_000004_create_user_restriction_table::Migration),
            Box::new(m20250401_000005_create_moderation_report_table::Migration),
            Box::new(m20250401_000006_create_notification_table::Migration),
            Box::new(m20250401_000007_create_audit_log_table::Migration),
        ]
    }
}
