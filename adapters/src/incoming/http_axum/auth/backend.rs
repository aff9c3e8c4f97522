use std::collections::BTreeSet;

use axum_login::{AuthUser, AuthnBackend, UserId as AxumUserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::actor::ActorContext;
use domain::perk::ADMIN_PERK;
use domain::profile::ProfileId;
use profile_moderation_application::error::AppError;
use profile_moderation_application::ports::incoming::auth::{DynAuthUseCase, SessionPrincipal};

/// Session principal. Reloaded from the profile store on every request, so
/// `is_banned` and `perks` reflect the current row.
///
/// `session_key` binds a session to the email and password in force at login;
/// changing either invalidates every other session of the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub perks: BTreeSet<String>,
    pub is_banned: bool,
    session_key: String,
}

impl From<SessionPrincipal> for User {
    fn from(principal: SessionPrincipal) -> Self {
        let SessionPrincipal {
            profile,
            credential_stamp,
        } = principal;
        let session_key = match credential_stamp {
            Some(stamp) => format!("{}:{stamp}", profile.email),
            None => profile.email.clone(),
        };

        Self {
            id: *profile.id.as_uuid(),
            is_banned: profile.is_banned(),
            email: profile.email,
            display_name: profile.display_name,
            perks: profile.perks,
            session_key,
        }
    }
}

impl User {
    pub fn profile_id(&self) -> ProfileId {
        ProfileId::from_uuid(self.id)
    }

    pub fn is_admin(&self) -> bool {
        self.perks.contains(ADMIN_PERK)
    }

    pub fn actor(&self) -> ActorContext {
        ActorContext {
            id: self.profile_id(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            perks: self.perks.clone(),
        }
    }
}

impl AuthUser for User {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.session_key.as_bytes()
    }
}

#[derive(Clone)]
pub struct AuthBackend {
    auth_use_case: DynAuthUseCase,
}

impl AuthBackend {
    pub fn new(auth_use_case: DynAuthUseCase) -> Self {
        Self { auth_use_case }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl AuthnBackend for AuthBackend {
    type User = User;
    type Credentials = Credentials;
    type Error = AppError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let principal = self
            .auth_use_case
            .authenticate(&creds.email, &creds.password)
            .await?;

        Ok(principal.map(User::from))
    }

    async fn get_user(
        &self,
        user_id: &AxumUserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        let principal = self
            .auth_use_case
            .find_principal(&ProfileId::from_uuid(*user_id))
            .await?;

        Ok(principal.map(User::from))
    }
}
