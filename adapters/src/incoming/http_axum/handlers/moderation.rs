#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::common_responses::{
    ConflictResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
    UnauthorizedResponse, ValidationErrorResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_login::AuthSession;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::{
    ApiResponseBanHistory, ApiResponseProfile, ApiResponseValue,
};
use crate::{
    incoming::http_axum::{
        auth::backend::AuthBackend,
        core::extractors::{profile_id, require_user, validate_request},
        dto::{
            requests::{BanHistoryQuery, BanUserRequest},
            responses::{
                ActiveBanResponse, ApiResponse, BanEventResponse, ProfileResponse,
                ProtectionResponse,
            },
        },
        error_mapper::HttpError,
    },
    shared::app_state::AppState,
};
use domain::{
    ban::{BanDuration, BanError},
    ban_time::remaining_ban_time,
};
use profile_moderation_application::{error::AppError, profile::view::ProfileView};

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/admin/users/{user_id}/protection",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "Target profile id")),
    responses(
        (status = 200, description = "Whether the target may be banned by the caller", body = ApiResponseValue),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("session" = []))
))]
#[instrument(skip(auth_session, state))]
pub async fn check_protection(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProtectionResponse>>, HttpError> {
    let current_user = require_user(auth_session)?;

    let is_protected = state
        .moderation_use_case
        .is_protected(&current_user.actor(), &profile_id(user_id))
        .await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        ProtectionResponse {
            user_id,
            is_protected,
        },
    ))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/admin/users/{user_id}/ban",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "Target profile id")),
    request_body = BanUserRequest,
    responses(
        (status = 200, description = "User banned, returns the updated profile", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("session" = []))
))]
#[instrument(skip(auth_session, state, request))]
pub async fn ban_user(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<BanUserRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, HttpError> {
    validate_request(&request)?;
    let current_user = require_user(auth_session)?;

    let duration: BanDuration = request
        .duration
        .parse()
        .map_err(|e: BanError| HttpError(AppError::from(e)))?;

    let profile = state
        .moderation_use_case
        .ban(
            &current_user.actor(),
            &profile_id(user_id),
            &request.reason,
            duration,
        )
        .await?;

    let view = ProfileView::compose(profile, None, OffsetDateTime::now_utc());
    Ok(Json(ApiResponse::success_with_data(Some(
        ProfileResponse::from_view(&view, true),
    ))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    delete,
    path = "/admin/users/{user_id}/ban",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "Target profile id")),
    responses(
        (status = 200, description = "User unbanned, returns the updated profile", body = ApiResponseProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("session" = []))
))]
#[instrument(skip(auth_session, state))]
pub async fn unban_user(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProfileResponse>>, HttpError> {
    let current_user = require_user(auth_session)?;

    let profile = state
        .moderation_use_case
        .unban(&current_user.actor(), &profile_id(user_id))
        .await?;

    let view = ProfileView::compose(profile, None, OffsetDateTime::now_utc());
    Ok(Json(ApiResponse::success_with_data(Some(
        ProfileResponse::from_view(&view, true),
    ))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/admin/users/{user_id}/ban",
    tag = "admin",
    params(("user_id" = Uuid, Path, description = "Target profile id")),
    responses(
        (status = 200, description = "Latest active ban event, if any", body = ApiResponseValue),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("session" = []))
))]
#[instrument(skip(auth_session, state))]
pub async fn get_active_ban(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ActiveBanResponse>>, HttpError> {
    require_user(auth_session)?;

    let active = state
        .moderation_use_case
        .load_active_ban(&profile_id(user_id))
        .await?;

    let now = OffsetDateTime::now_utc();
    let remaining = active
        .as_ref()
        .map(|event| remaining_ban_time(event.ends_at, now));

    Ok(Json(ApiResponse::success_with_data(Some(
        ActiveBanResponse {
            ban: active.map(BanEventResponse::from),
            remaining_ban_time: remaining,
        },
    ))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/admin/users/{user_id}/bans",
    tag = "admin",
    params(
        ("user_id" = Uuid, Path, description = "Target profile id"),
        BanHistoryQuery
    ),
    responses(
        (status = 200, description = "Ban events, newest first", body = ApiResponseBanHistory),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("session" = []))
))]
#[instrument(skip(auth_session, state))]
pub async fn list_ban_history(
    auth_session: AuthSession<AuthBackend>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<BanHistoryQuery>,
) -> Result<Json<ApiResponse<Vec<BanEventResponse>>>, HttpError> {
    validate_request(&query)?;
    let current_user = require_user(auth_session)?;

    let events = state
        .moderation_use_case
        .ban_history(&current_user.actor(), &profile_id(user_id), query.limit())
        .await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        events.into_iter().map(BanEventResponse::from).collect(),
    ))))
}
