use std::sync::Arc;

use crate::error::AppResult;
use domain::profile::{ModerationState, Profile, ProfileId};

/// Login material for an account; `password_hash` is absent for accounts
/// that only sign in through an external provider.
#[derive(Debug, Clone)]
pub struct ProfileCredentials {
    pub profile_id: ProfileId,
    pub password_hash: Option<String>,
}

#[async_trait::async_trait]
pub trait ProfileStorePort: Send + Sync {
    async fn find_profile_by_id(&self, id: &ProfileId) -> AppResult<Option<Profile>>;

    async fn find_credentials_by_email(&self, email: &str)
    -> AppResult<Option<ProfileCredentials>>;

    async fn find_password_hash(&self, id: &ProfileId) -> AppResult<Option<String>>;

    /// Overwrites every moderation column. Writing `Active` nulls the ban
    /// detail columns.
    async fn update_moderation(
        &self,
        id: &ProfileId,
        moderation: &ModerationState,
    ) -> AppResult<Profile>;

    async fn update_display_name(&self, id: &ProfileId, display_name: &str) -> AppResult<Profile>;

    async fn update_password_hash(&self, id: &ProfileId, password_hash: &str) -> AppResult<()>;

    async fn update_active_perk(&self, id: &ProfileId, perk: &str) -> AppResult<Profile>;

    async fn update_avatar(&self, id: &ProfileId, avatar_url: &str) -> AppResult<Profile>;
}

pub type DynProfileStorePort = Arc<dyn ProfileStorePort>;
