//! Identity Core infra
//!
//! Postgres persistence, external-IdP transport, and crypto primitives
//! backing every trait `identity_core_core` declares. Nothing here
//! contains business logic — every invariant and business rule lives in
//! the core crate; this layer only moves bytes.

pub mod cache;
pub mod domains;
pub mod events;
pub mod messaging;
pub mod password_hasher;
pub mod saml;
pub mod signer;
pub mod totp_verifier;

pub use cache::{MokaFlagCache, MokaTenantCache};
pub use events::PendingEventSink;
pub use messaging::SlackClient;
pub use password_hasher::BcryptHasher;
pub use saml::{SamaelSamlClient, SamlConfig};
pub use signer::HmacTokenSigner;
pub use totp_verifier::TotpRsVerifier;
