use std::sync::Arc;

use profile_moderation_application::infrastructure_config::Config;
use profile_moderation_application::ports::incoming::{
    auth::DynAuthUseCase, moderation::DynModerationUseCase, profile::DynProfileUseCase,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_use_case: DynAuthUseCase,
    pub profile_use_case: DynProfileUseCase,
    pub moderation_use_case: DynModerationUseCase,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        auth_use_case: DynAuthUseCase,
        profile_use_case: DynProfileUseCase,
        moderation_use_case: DynModerationUseCase,
    ) -> Self {
        Self {
            config,
            auth_use_case,
            profile_use_case,
            moderation_use_case,
        }
    }
}
