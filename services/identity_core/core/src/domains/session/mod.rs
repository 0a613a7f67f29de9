pub mod model;
pub mod repository;
pub mod service;

pub use model::{Device, DeviceInput, Session, SessionData, SessionToken, TokenKind, TokenPair};
pub use repository::SessionRepository;
pub use service::{FixedRefreshTtl, RefreshTtlResolver, SessionStore, SessionStoreConfig, TokenSigner};
