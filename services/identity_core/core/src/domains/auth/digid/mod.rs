pub mod model;
pub mod repository;
pub mod service;

pub use model::{extract_bsn, DigidLogin, ResolvedAssertion, SamlStatusCode};
pub use repository::DigidLoginRepository;
pub use service::{DigidProvider, SamlClient};
