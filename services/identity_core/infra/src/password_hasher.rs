use identity_core_core::domains::auth::password::PasswordHasher;
use shared_error::AppError;

/// `bcrypt`-backed [`PasswordHasher`], cost fixed by the caller (spec
/// §4.5.1: cost 13, a deliberate deviation from the teacher's
/// `bcrypt::DEFAULT_COST`).
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| AppError::server("server.internal.passwordHash", e))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, hash).map_err(|e| AppError::server("server.internal.passwordHash", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("correct horse battery staple").unwrap();
        assert!(hasher.verify("correct horse battery staple", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }
}
