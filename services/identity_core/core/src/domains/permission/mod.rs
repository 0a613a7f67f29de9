pub mod model;
pub mod repository;
pub mod service;

pub use model::{MandatoryRoleConfig, Permission, Role, RolePermission, RoleSyncDelta, UserPermissionSummary, UserRole};
pub use repository::PermissionRepository;
pub use service::{has_all_permissions, PermissionEngine, RoleSelector, MANAGE_PERMISSION};
