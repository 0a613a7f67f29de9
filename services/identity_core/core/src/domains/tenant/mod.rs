pub mod model;
pub mod repository;
pub mod service;

pub use model::{Environment, ResolvedTenantContext, Tenant, TenantConfigDocument, TenantConfigEntry, UrlConfigEntry};
pub use repository::TenantRepository;
pub use service::{TenantCache, TenantIndex, TenantResolutionHeaders, TenantResolver};
