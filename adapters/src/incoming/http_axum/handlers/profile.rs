#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::common_responses::{
    ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    ValidationErrorResponse,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_login::{AuthSession, AuthnBackend};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ApiResponseProfile;
use crate::{
    incoming::http_axum::{
        auth::backend::AuthBackend,
        core::extractors::{profile_id, require_user, validate_request},
        dto::{
            requests::{
                ChangeAvatarRequest, ChangePasswordRequest, SelectPerkRequest,
                UpdateDisplayNameRequest,
            },
            responses::{ApiResponse, ProfileResponse},
        },
        error_mapper::HttpError,
    },
    shared::app_state::AppState,
};
use domain::profile::Profile;
use profile_moderation_application::error::AppError;
use profile_moderation_application::profile::view::ProfileView;

fn own_profile_response(profile: Profile) -> Json<ApiResponse<ProfileResponse>> {
    let view = ProfileView::compose(profile, None, OffsetDateTime::now_utc());
    Json(ApiResponse::success_with_data(Some(
        ProfileResponse::from_view(&view, true),
    )))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/profiles/{user_id}",
    params(("user_id" = Uuid, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile with perk badge and ban notice", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profile",
    summary = "Get a profile",
    description = "Returns a profile view. The email address is only included for the profile owner and administrators."
))]
#[instrument(skip(auth_session, state))]
pub async fn get_profile(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let viewer = require_user(auth_session)?;

    let view = state
        .profile_use_case
        .get_profile_view(&profile_id(user_id), OffsetDateTime::now_utc())
        .await?;

    let include_email = viewer.id == user_id || viewer.is_admin();
    Ok(Json(ApiResponse::success_with_data(Some(
        ProfileResponse::from_view(&view, include_email),
    ))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    put,
    path = "/profile/display-name",
    request_body = UpdateDisplayNameRequest,
    responses(
        (status = 200, description = "Display name updated", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profile",
    summary = "Update display name"
))]
pub async fn update_display_name(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Json(request): Json<UpdateDisplayNameRequest>,
) -> Result<impl IntoResponse, HttpError> {
    validate_request(&request)?;
    let user = require_user(auth_session)?;

    let profile = state
        .profile_use_case
        .update_display_name(&user.actor(), &request.display_name)
        .await?;

    Ok(own_profile_response(profile))
}

#[cfg_attr(feature = "docs", utoipa::path(
    put,
    path = "/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profile",
    summary = "Change password",
    description = "Verifies the current password and stores a new argon2 hash when the new password is strong enough."
))]
pub async fn change_password(
    mut auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, HttpError> {
    validate_request(&request)?;
    let user = require_user(auth_session.clone())?;

    state
        .profile_use_case
        .change_password(
            &user.actor(),
            &request.current_password,
            &request.new_password,
        )
        .await?;

    // The new hash changes the session key, so re-issue the current session.
    let refreshed = auth_session
        .backend
        .get_user(&user.id)
        .await?
        .ok_or(HttpError(AppError::Unauthorized))?;
    auth_session
        .login(&refreshed)
        .await
        .map_err(|_| HttpError(AppError::InternalServerError))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg_attr(feature = "docs", utoipa::path(
    put,
    path = "/profile/perk",
    request_body = SelectPerkRequest,
    responses(
        (status = 200, description = "Active perk changed", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profile",
    summary = "Select active perk"
))]
pub async fn select_perk(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Json(request): Json<SelectPerkRequest>,
) -> Result<impl IntoResponse, HttpError> {
    validate_request(&request)?;
    let user = require_user(auth_session)?;

    let profile = state
        .profile_use_case
        .select_perk(&user.actor(), &request.perk)
        .await?;

    Ok(own_profile_response(profile))
}

#[cfg_attr(feature = "docs", utoipa::path(
    put,
    path = "/profile/avatar",
    request_body = ChangeAvatarRequest,
    responses(
        (status = 200, description = "Avatar changed", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "profile",
    summary = "Change avatar"
))]
pub async fn change_avatar(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Json(request): Json<ChangeAvatarRequest>,
) -> Result<impl IntoResponse, HttpError> {
    validate_request(&request)?;
    let user = require_user(auth_session)?;

    let profile = state
        .profile_use_case
        .change_avatar(&user.actor(), &request.avatar_url)
        .await?;

    Ok(own_profile_response(profile))
}
