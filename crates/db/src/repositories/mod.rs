//! Database repositories.

pub mod account;
pub mod audit_log;
pub mod moderation_action;
pub mod notification;
pub mod report;
pub mod restriction;
pub mod role;

pub use account::AccountRepository;
pub use audit_log::AuditLogRepository;
pub use moderation_action::ModerationActionRepository;
pub use notification::NotificationRepository;
pub use report::ReportRepository;
pub use restriction::RestrictionRepository;
pub use role::RoleRepository;
