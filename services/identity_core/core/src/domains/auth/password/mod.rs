pub mod model;
pub mod repository;
pub mod service;

pub use model::{PasswordLogin, PasswordLoginAttempt, PasswordLoginReset, BCRYPT_COST};
pub use repository::PasswordLoginRepository;
pub use service::{PasswordHasher, PasswordProvider, RemoveSessionPolicy};
