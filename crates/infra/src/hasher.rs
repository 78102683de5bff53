use worksphere_auth::PasswordHasher;
use worksphere_core::{DomainError, DomainResult};

/// bcrypt-backed [`PasswordHasher`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        if plaintext.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        bcrypt::hash(plaintext, self.cost).map_err(|e| DomainError::Store(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        bcrypt::verify(plaintext, hash).map_err(|e| DomainError::validation(format!("malformed password hash: {e}")))
    }
}
