pub mod model;
pub mod repository;
pub mod service;

pub use model::{KeycloakLogin, TenantSettings};
pub use repository::KeycloakLoginRepository;
pub use service::{KeycloakProvider, KEYCLOAK_BASED_USER_REGISTERED};
