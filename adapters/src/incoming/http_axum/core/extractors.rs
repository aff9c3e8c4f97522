use axum_login::AuthSession;
use uuid::Uuid;
use validator::Validate;

use crate::incoming::http_axum::{
    auth::backend::{AuthBackend, User},
    error_mapper::HttpError,
};
use domain::profile::ProfileId;
use profile_moderation_application::error::AppError;

pub fn require_user(auth_session: AuthSession<AuthBackend>) -> Result<User, HttpError> {
    auth_session.user.ok_or(HttpError(AppError::Unauthorized))
}

pub fn validate_request<T: Validate>(request: &T) -> Result<(), HttpError> {
    request.validate().map_err(|e| {
        HttpError(AppError::ValidationError {
            message: format!("Validation failed: {e}"),
        })
    })
}

pub fn profile_id(user_id: Uuid) -> ProfileId {
    ProfileId::from_uuid(user_id)
}
