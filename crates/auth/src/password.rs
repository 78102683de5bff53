use worksphere_core::DomainResult;

/// Password hashing collaborator.
///
/// The domain never sees plaintext beyond this call.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool>;
}

impl<H: PasswordHasher + ?Sized> PasswordHasher for std::sync::Arc<H> {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        (**self).hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        (**self).verify(plaintext, hash)
    }
}
