//! Business logic services.

#![allow(missing_docs)]

pub mod authorization;
pub mod content;
pub mod moderation;
pub mod notification;
pub mod roles;

pub use authorization::{LogKind, PolicyService};
pub use content::{ContentKind, ContentStore, ContentStoreService, NoOpContentStore};
pub use moderation::{
    CreateReportInput, ModerationService, ReportStatus, ReportType, ResolveReportInput,
    SuspendUserInput, SuspensionOutcome,
};
pub use notification::NotificationService;
pub use roles::{ActorRoles, RoleService};
