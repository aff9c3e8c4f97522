use crate::error::AppResult;
use crate::ports::incoming::auth::{AuthUseCase, SessionPrincipal};
use crate::ports::outgoing::password_hasher::DynPasswordHasherPort;
use crate::ports::outgoing::profile_store::DynProfileStorePort;
use domain::profile::ProfileId;

pub struct AuthService {
    profile_store: DynProfileStorePort,
    password_hasher: DynPasswordHasherPort,
}

impl AuthService {
    pub fn new(profile_store: DynProfileStorePort, password_hasher: DynPasswordHasherPort) -> Self {
        Self {
            profile_store,
            password_hasher,
        }
    }
}

#[async_trait::async_trait]
impl AuthUseCase for AuthService {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<SessionPrincipal>> {
        let Some(credentials) = self
            .profile_store
            .find_credentials_by_email(email.trim())
            .await?
        else {
            return Ok(None);
        };

        let Some(password_hash) = credentials.password_hash else {
            tracing::debug!(
                user_id = %credentials.profile_id,
                "Login attempt for account without local password"
            );
            return Ok(None);
        };

        if !self.password_hasher.verify(password, &password_hash)? {
            return Ok(None);
        }

        let profile = self
            .profile_store
            .find_profile_by_id(&credentials.profile_id)
            .await?;

        Ok(profile.map(|profile| SessionPrincipal {
            profile,
            credential_stamp: self.password_hasher.credential_stamp(&password_hash),
        }))
    }

    async fn find_principal(&self, id: &ProfileId) -> AppResult<Option<SessionPrincipal>> {
        let Some(profile) = self.profile_store.find_profile_by_id(id).await? else {
            return Ok(None);
        };

        let credential_stamp = self
            .profile_store
            .find_password_hash(id)
            .await?
            .and_then(|hash| self.password_hasher.credential_stamp(&hash));

        Ok(Some(SessionPrincipal {
            profile,
            credential_stamp,
        }))
    }
}
