use std::sync::Arc;

use crate::error::AppResult;
use domain::{ban::BanEvent, profile::ProfileId};

#[async_trait::async_trait]
pub trait BanEventStorePort: Send + Sync {
    async fn insert_ban_event(&self, event: &BanEvent) -> AppResult<()>;

    /// Marks every active event of the user inactive, returning how many
    /// rows changed.
    async fn deactivate_active_ban_events(&self, user_id: &ProfileId) -> AppResult<u64>;

    /// Newest active event by creation time.
    async fn find_latest_active_ban_event(&self, user_id: &ProfileId)
    -> AppResult<Option<BanEvent>>;

    async fn list_ban_events(&self, user_id: &ProfileId, limit: u32) -> AppResult<Vec<BanEvent>>;
}

pub type DynBanEventStorePort = Arc<dyn BanEventStorePort>;
