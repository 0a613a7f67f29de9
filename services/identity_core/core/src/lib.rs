//! Identity Core
//!
//! Business logic, domain models, and trait definitions for the identity,
//! multi-tenancy, and session core. Zero infrastructure dependencies: every
//! persistence and external-IdP concern is expressed as a trait implemented
//! by `identity_core_infra`.
//!
//! ## Architecture
//!
//! - `domains/tenant`: Tenant Resolver (§4.1)
//! - `domains/permission`: Permission Engine (§4.2)
//! - `domains/session`: Session Store (§4.3)
//! - `domains/user`: User Directory (§4.4)
//! - `domains/auth`: Authentication Providers (§4.5)
//! - `domains/feature_flag`: Feature Flag Engine (§4.6)
//! - `domains/management`: Management Interface (§4.8)

pub mod domains;

pub use shared_error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
