use std::sync::Arc;

use crate::error::AppResult;
use domain::{
    actor::ActorContext,
    ban::{BanDuration, BanEvent},
    profile::{Profile, ProfileId},
};

#[async_trait::async_trait]
pub trait ModerationUseCase: Send + Sync {
    /// Whether `actor` is barred from banning the target.
    async fn is_protected(&self, actor: &ActorContext, target_id: &ProfileId) -> AppResult<bool>;

    async fn ban(
        &self,
        actor: &ActorContext,
        target_id: &ProfileId,
        reason: &str,
        duration: BanDuration,
    ) -> AppResult<Profile>;

    async fn unban(&self, actor: &ActorContext, target_id: &ProfileId) -> AppResult<Profile>;

    async fn load_active_ban(&self, user_id: &ProfileId) -> AppResult<Option<BanEvent>>;

    async fn ban_history(
        &self,
        actor: &ActorContext,
        user_id: &ProfileId,
        limit: u32,
    ) -> AppResult<Vec<BanEvent>>;
}

pub type DynModerationUseCase = Arc<dyn ModerationUseCase>;
