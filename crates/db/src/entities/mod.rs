//! Database entities.

pub mod account;
pub mod audit_log;
pub mod moderation_action;
pub mod moderation_report;
pub mod notification;
pub mod role_assignment;
pub mod user_restriction;

pub use account::Entity as Account;
pub use audit_log::Entity as AuditLog;
pub use moderation_action::Entity as ModerationAction;
pub use moderation_report::Entity as ModerationReport;
pub use notification::Entity as Notification;
pub use role_assignment::Entity as RoleAssignment;
pub use user_restriction::Entity as UserRestriction;
