use std::sync::Arc;

use time::OffsetDateTime;

use crate::error::AppResult;
use crate::profile::view::ProfileView;
use domain::{
    actor::ActorContext,
    profile::{Profile, ProfileId},
};

#[async_trait::async_trait]
pub trait ProfileUseCase: Send + Sync {
    async fn get_profile_view(&self, id: &ProfileId, now: OffsetDateTime)
    -> AppResult<ProfileView>;

    async fn update_display_name(
        &self,
        actor: &ActorContext,
        display_name: &str,
    ) -> AppResult<Profile>;

    async fn change_password(
        &self,
        actor: &ActorContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    async fn select_perk(&self, actor: &ActorContext, perk: &str) -> AppResult<Profile>;

    async fn change_avatar(&self, actor: &ActorContext, avatar_url: &str) -> AppResult<Profile>;
}

pub type DynProfileUseCase = Arc<dyn ProfileUseCase>;
