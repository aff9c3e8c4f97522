use crate::incoming::http_axum::{dto, handlers};
use domain::ban::BanDuration;
use dto::common_responses::{
    ConflictResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
    UnauthorizedResponse, ValidationErrorResponse,
};
use dto::requests::{
    BanUserRequest, ChangeAvatarRequest, ChangePasswordRequest, LoginRequest, SelectPerkRequest,
    UpdateDisplayNameRequest,
};
use dto::responses::{
    ActiveBanResponse, ApiResponseBanHistory, ApiResponseProfile, ApiResponseValue,
    BanEventResponse, BanNoticeResponse, ProfileResponse, ProtectionResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::login_handler,
        handlers::auth::logout_handler,
        handlers::auth::me_handler,
        handlers::profile::get_profile,
        handlers::profile::update_display_name,
        handlers::profile::change_password,
        handlers::profile::select_perk,
        handlers::profile::change_avatar,
        handlers::moderation::check_protection,
        handlers::moderation::ban_user,
        handlers::moderation::unban_user,
        handlers::moderation::get_active_ban,
        handlers::moderation::list_ban_history,
    ),
    components(
        schemas(
            ApiResponseValue,
            ApiResponseProfile,
            ApiResponseBanHistory,
            LoginRequest,
            UpdateDisplayNameRequest,
            ChangePasswordRequest,
            SelectPerkRequest,
            ChangeAvatarRequest,
            BanUserRequest,
            BanDuration,
            ProfileResponse,
            BanNoticeResponse,
            BanEventResponse,
            ActiveBanResponse,
            ProtectionResponse
        ),
        responses(
            InternalServerErrorResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            ValidationErrorResponse
        )
    ),
    tags(
        (name = "auth", description = "Session login and logout, and the current profile"),
        (name = "profile", description = "Profile reads and self-service edits: display name, password, active perk and avatar. Banned accounts may read but not edit."),
        (name = "admin", description = "Moderation: protection checks, ban and unban, active ban lookup and ban history (requires the admin perk)"),
        (name = "system", description = "System health and status monitoring")
    ),
    info(
        title = "Profile Moderation API",
        description = "Member profiles with perk badges, and an admin ban lifecycle with an audit trail of ban events.",
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    )
)]
pub struct ApiDoc;
