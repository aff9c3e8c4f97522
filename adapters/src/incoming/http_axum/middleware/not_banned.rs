use axum::{extract::Request, middleware::Next, response::Response};
use axum_login::AuthSession;

use crate::incoming::http_axum::{auth::backend::AuthBackend, error_mapper::HttpError};
use profile_moderation_application::error::AppError;

/// Banned accounts keep read access to their profile so they can see the
/// ban notice, but every mutation route sits behind this layer.
pub async fn require_not_banned(
    auth_session: AuthSession<AuthBackend>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let Some(user) = auth_session.user else {
        return Err(HttpError(AppError::Unauthorized));
    };

    if user.is_banned {
        tracing::debug!(user_id = %user.id, "Rejected profile mutation from banned account");
        return Err(HttpError(AppError::Forbidden {
            message: "Banned accounts cannot edit their profile".to_string(),
        }));
    }

    Ok(next.run(request).await)
}
