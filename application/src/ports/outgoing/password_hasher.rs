use std::sync::Arc;

use crate::error::AppResult;

pub trait PasswordHasherPort: Send + Sync {
    /// Produces a PHC-format hash with a fresh salt.
    fn hash(&self, password: &str) -> AppResult<String>;

    /// `Ok(false)` on mismatch or empty input; `Err` only when the stored hash
    /// cannot be parsed.
    fn verify(&self, password: &str, stored_hash: &str) -> AppResult<bool>;

    /// Non-secret value unique to one stored hash (its salt). `None` when the
    /// hash cannot be parsed.
    fn credential_stamp(&self, stored_hash: &str) -> Option<String>;
}

pub type DynPasswordHasherPort = Arc<dyn PasswordHasherPort>;
