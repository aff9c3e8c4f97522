#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::common_responses::{
    InternalServerErrorResponse, UnauthorizedResponse, ValidationErrorResponse,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_login::AuthSession;
use time::OffsetDateTime;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ApiResponseProfile;
use crate::{
    incoming::http_axum::{
        auth::backend::{AuthBackend, Credentials},
        core::extractors::{require_user, validate_request},
        dto::{
            requests::LoginRequest,
            responses::{ApiResponse, ProfileResponse},
        },
        error_mapper::HttpError,
    },
    shared::app_state::AppState,
};
use profile_moderation_application::error::AppError;

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User logged in successfully", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "auth",
    summary = "Login with email and password",
    description = "Authenticates user credentials and creates a session cookie if successful. Banned accounts may log in to read their ban notice."
))]
pub async fn login_handler(
    State(state): State<AppState>,
    mut auth_session: AuthSession<AuthBackend>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    validate_request(&request)?;

    let credentials = Credentials {
        email: request.email,
        password: request.password,
    };

    let user = auth_session.authenticate(credentials).await.map_err(|e| {
        tracing::error!(error = %e, "Authentication backend failed");
        HttpError(AppError::InternalServerError)
    })?;

    let Some(user) = user else {
        return Err(HttpError(AppError::Unauthorized));
    };

    auth_session
        .login(&user)
        .await
        .map_err(|_| HttpError(AppError::InternalServerError))?;

    tracing::info!(user_id = %user.id, "User logged in");

    let view = state
        .profile_use_case
        .get_profile_view(&user.profile_id(), OffsetDateTime::now_utc())
        .await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        ProfileResponse::from_view(&view, true),
    ))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "User logged out successfully"),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "auth",
    summary = "Logout current user",
    description = "Clears the user session and logs out the current user."
))]
pub async fn logout_handler(
    mut auth_session: AuthSession<AuthBackend>,
) -> Result<impl IntoResponse, HttpError> {
    auth_session
        .logout()
        .await
        .map_err(|_| HttpError(AppError::InternalServerError))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current profile with perk badge and ban notice", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "auth",
    summary = "Get current profile",
    description = "Returns the profile of the currently authenticated user, including the ban notice and remaining ban time when banned."
))]
pub async fn me_handler(
    State(state): State<AppState>,
    auth_session: AuthSession<AuthBackend>,
) -> Result<impl IntoResponse, HttpError> {
    let user = require_user(auth_session)?;

    let view = state
        .profile_use_case
        .get_profile_view(&user.profile_id(), OffsetDateTime::now_utc())
        .await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        ProfileResponse::from_view(&view, true),
    ))))
}
