//! External service port traits (embeddings, password hashing).

use async_trait::async_trait;

use super::error::{EmbeddingError, PasswordError};

/// Maps text to a dense vector. Implementations must return vectors of one
/// fixed dimension for a given model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasherPort: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}
