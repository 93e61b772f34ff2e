//! SurrealDB repository implementations.

mod audit;
mod permission;
mod role;
mod role_permission;
mod user;
mod user_permission;
mod user_role;

pub use audit::SurrealAuditLogRepository;
pub use permission::SurrealPermissionRepository;
pub use role::SurrealRoleRepository;
pub use role_permission::SurrealRolePermissionRepository;
pub use user::SurrealUserRepository;
pub use user_permission::SurrealUserPermissionRepository;
pub use user_role::SurrealUserRoleRepository;
