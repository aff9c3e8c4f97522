use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use axum_login::{AuthManagerLayer, AuthManagerLayerBuilder};
use profile_moderation_application::error::AppError;
use tower_sessions_redis_store::{RedisStore, fred::prelude::Client};
#[cfg(feature = "docs")]
use utoipa::OpenApi;
#[cfg(feature = "docs")]
use utoipa_swagger_ui::SwaggerUi;

use crate::incoming::http_axum::{
    auth::{
        backend::AuthBackend,
        session::{SessionConfig, create_session_layer},
    },
    handlers::{
        auth::{login_handler, logout_handler, me_handler},
        health::health_check,
        moderation::{ban_user, check_protection, get_active_ban, list_ban_history, unban_user},
        profile::{change_avatar, change_password, get_profile, select_perk, update_display_name},
    },
    middleware::{admin_auth::require_admin_role, not_banned::require_not_banned},
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;
use profile_moderation_application::ports::incoming::auth::DynAuthUseCase;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::docs::ApiDoc;

type AuthLayer = AuthManagerLayer<AuthBackend, RedisStore<Client>>;

pub async fn build_application_router(
    state: &AppState,
    auth_use_case: DynAuthUseCase,
) -> Result<Router<AppState>, AppError> {
    let session_config = SessionConfig::from(&state.config.auth);
    let session_layer =
        create_session_layer(&state.config.redis.redis_url, &session_config).await?;

    let auth_backend = AuthBackend::new(auth_use_case);
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    Ok(build_core_routes()
        .merge(build_auth_routes(auth_layer.clone()))
        .merge(build_profile_routes(auth_layer.clone()))
        .merge(build_admin_routes(auth_layer))
        .with_request_id())
}

fn build_core_routes() -> Router<AppState> {
    let router = Router::new().route("/health", get(health_check));

    #[cfg(feature = "docs")]
    {
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    #[cfg(not(feature = "docs"))]
    {
        router
    }
}

fn build_auth_routes(auth_layer: AuthLayer) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
        .with_auth(auth_layer)
}

fn build_profile_routes(auth_layer: AuthLayer) -> Router<AppState> {
    let read_routes = Router::new().route("/profiles/{user_id}", get(get_profile));

    let edit_routes = Router::new()
        .route("/profile/display-name", put(update_display_name))
        .route("/profile/password", put(change_password))
        .route("/profile/perk", put(select_perk))
        .route("/profile/avatar", put(change_avatar))
        .layer(middleware::from_fn(require_not_banned));

    read_routes.merge(edit_routes).with_auth(auth_layer)
}

fn build_admin_routes(auth_layer: AuthLayer) -> Router<AppState> {
    Router::new()
        .route("/admin/users/{user_id}/protection", get(check_protection))
        .route(
            "/admin/users/{user_id}/ban",
            post(ban_user).delete(unban_user).get(get_active_ban),
        )
        .route("/admin/users/{user_id}/bans", get(list_ban_history))
        .layer(middleware::from_fn(require_admin_role))
        .with_auth(auth_layer)
}
