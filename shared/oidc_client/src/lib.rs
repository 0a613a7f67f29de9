//! Federated OIDC client for the "Keycloak-based" authentication provider
//! (spec §4.5.4): standard authorization-code redirect, HTTP-Basic
//! client-credentials code exchange, `/userinfo` lookup.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{OidcClient, OidcOAuth2Client};
pub use config::OidcConfig;
pub use error::{OidcError, Result};
pub use types::{TokenResponse, UserInfo};
