pub mod model;
pub mod repository;
pub mod service;

pub use model::{new_login_token, AnonymousLogin};
pub use repository::AnonymousLoginRepository;
pub use service::AnonymousProvider;
