//! In-memory login harness for tests of session-gated routes.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::Path,
    http::{Method, Request, StatusCode, header},
    routing::post,
};
use axum_login::{AuthManagerLayerBuilder, AuthSession, AuthnBackend};
use time::OffsetDateTime;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use uuid::Uuid;

use crate::incoming::http_axum::auth::backend::AuthBackend;
use domain::perk::{ADMIN_PERK, DEFAULT_PERK};
use domain::profile::{BanDetails, ModerationState, Profile, ProfileId};
use profile_moderation_application::error::AppResult;
use profile_moderation_application::ports::incoming::auth::{AuthUseCase, SessionPrincipal};

struct FixedProfiles(HashMap<ProfileId, Profile>);

#[async_trait::async_trait]
impl AuthUseCase for FixedProfiles {
    async fn authenticate(
        &self,
        _email: &str,
        _password: &str,
    ) -> AppResult<Option<SessionPrincipal>> {
        Ok(None)
    }

    async fn find_principal(&self, id: &ProfileId) -> AppResult<Option<SessionPrincipal>> {
        Ok(self.0.get(id).cloned().map(|profile| SessionPrincipal {
            profile,
            credential_stamp: None,
        }))
    }
}

pub fn profile(display_name: &str, admin: bool, banned: bool) -> Profile {
    let mut perks = BTreeSet::new();
    if admin {
        perks.insert(ADMIN_PERK.to_string());
    }
    let moderation = if banned {
        ModerationState::Banned(BanDetails::new(
            "spam".to_string(),
            None,
            "root".to_string(),
            ProfileId::new(),
        ))
    } else {
        ModerationState::Active
    };

    Profile {
        id: ProfileId::new(),
        display_name: display_name.to_string(),
        email: format!("{display_name}@example.com"),
        perks,
        active_perk: DEFAULT_PERK.to_string(),
        avatar_url: None,
        created_at: OffsetDateTime::now_utc(),
        moderation,
    }
}

async fn login_as(
    mut auth_session: AuthSession<AuthBackend>,
    Path(user_id): Path<Uuid>,
) -> StatusCode {
    let Ok(Some(user)) = auth_session.backend.get_user(&user_id).await else {
        return StatusCode::NOT_FOUND;
    };
    match auth_session.login(&user).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wraps `gated` in an in-memory session and auth layer, and adds a
/// `POST /test-login/{user_id}` route that signs in as any of `profiles`.
pub fn with_sessions(gated: Router, profiles: &[Profile]) -> Router {
    let auth_use_case = Arc::new(FixedProfiles(
        profiles
            .iter()
            .map(|profile| (profile.id, profile.clone()))
            .collect(),
    ));
    let session_layer = SessionManagerLayer::new(MemoryStore::default());
    let auth_layer =
        AuthManagerLayerBuilder::new(AuthBackend::new(auth_use_case), session_layer).build();

    gated
        .route("/test-login/{user_id}", post(login_as))
        .layer(auth_layer)
}

pub async fn session_cookie(app: &Router, user_id: &ProfileId) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/test-login/{}", user_id.as_uuid()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub async fn status_of(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
) -> StatusCode {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}
