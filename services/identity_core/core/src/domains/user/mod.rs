pub mod model;
pub mod repository;
pub mod service;

pub use model::{
    CreateUserOptions, PasswordRegistration, ProviderRegistration, RequireUserOptions, SessionFacts, User,
    UserSelector, UserTenant,
};
pub use repository::{KeycloakEmailUniquenessChecker, PasswordEmailUniquenessChecker, UserRepository};
pub use service::{UserDirectory, USER_SOFT_DELETED_EVENT};
