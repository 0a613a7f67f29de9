pub mod anonymous;
pub mod digid;
pub mod keycloak;
pub mod password;
pub mod totp;

pub use anonymous::PgAnonymousLoginRepository;
pub use digid::PgDigidLoginRepository;
pub use keycloak::PgKeycloakLoginRepository;
pub use password::PgPasswordLoginRepository;
pub use totp::PgTotpRepository;
