pub mod password_validator;

// Re-export for convenience
pub use password_validator::{
    validate_password_quick, validate_password_strength, PasswordValidationResult,
};
