pub mod model;
pub mod repository;
pub mod service;

pub use model::{is_reserved, FeatureFlag, EXAMPLE_FLAG_NAME, RESERVED_PREFIX};
pub use repository::FeatureFlagRepository;
pub use service::{FeatureFlagEngine, FlagCache};
