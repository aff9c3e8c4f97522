use std::sync::Arc;

use crate::error::AppResult;
use domain::profile::{Profile, ProfileId};

/// A profile as seen by the session layer.
#[derive(Debug, Clone)]
pub struct SessionPrincipal {
    pub profile: Profile,
    /// Changes whenever the password changes; `None` without a local password.
    pub credential_stamp: Option<String>,
}

#[async_trait::async_trait]
pub trait AuthUseCase: Send + Sync {
    /// `None` when the email is unknown, the account has no local password,
    /// or the password does not match.
    async fn authenticate(&self, email: &str, password: &str)
    -> AppResult<Option<SessionPrincipal>>;

    async fn find_principal(&self, id: &ProfileId) -> AppResult<Option<SessionPrincipal>>;
}

pub type DynAuthUseCase = Arc<dyn AuthUseCase>;
