pub mod model;
pub mod repository;
pub mod service;

pub use model::{TotpSettings, VERIFY_WINDOW_STEPS};
pub use repository::TotpRepository;
pub use service::{TotpCodeVerifier, TotpProvider, TOTP_MANAGE_PERMISSION};
