use serde::{Deserialize, Serialize};
#[cfg(feature = "docs")]
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use profile_moderation_application::profile::service::MAX_AVATAR_URL_BYTES;

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

// `validator` requires a `u64` bound for `length(max = ...)`.
const MAX_AVATAR_URL_BYTES_U64: u64 = MAX_AVATAR_URL_BYTES as u64;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to login with email and password",
    example = json!({
        "email": "user@example.com",
        "password": "MyVerySecure!Password123"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[cfg_attr(feature = "docs", schema(example = "user@example.com"))]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[cfg_attr(feature = "docs", schema(example = "secure_password"))]
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to change the display name. Surrounding whitespace is trimmed; the result must be 3 to 32 characters without control characters.",
    example = json!({
        "display_name": "Mira Nova"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDisplayNameRequest {
    #[cfg_attr(feature = "docs", schema(example = "Mira Nova"))]
    #[validate(length(min = 1, message = "Display name cannot be empty"))]
    pub display_name: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to change the account password. The new password is scored with zxcvbn and must reach the configured minimum (3/4 by default).",
    example = json!({
        "current_password": "old-password",
        "new_password": "vivid-Lantern-93-orchard-Pebble"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password cannot be empty"))]
    pub current_password: String,

    #[validate(length(min = 1, message = "New password cannot be empty"))]
    pub new_password: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to wear a perk badge. The perk must be granted to the account or be `default-user`.",
    example = json!({
        "perk": "sponsor"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectPerkRequest {
    #[cfg_attr(feature = "docs", schema(example = "sponsor"))]
    #[validate(length(min = 1, max = 64, message = "Perk must be between 1 and 64 characters"))]
    pub perk: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to change the avatar to an absolute http(s) URL",
    example = json!({
        "avatar_url": "https://cdn.example.com/avatars/7.png"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangeAvatarRequest {
    #[cfg_attr(feature = "docs", schema(example = "https://cdn.example.com/avatars/7.png"))]
    #[validate(
        url(message = "Avatar must be a valid URL"),
        length(max = MAX_AVATAR_URL_BYTES_U64, message = "Avatar URL is too long")
    )]
    pub avatar_url: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to ban a user. `duration` is one of 30m, 2h, 6h, 12h, 1d, 3d, 1w or permanent.",
    example = json!({
        "reason": "Spam in public channels",
        "duration": "1d"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BanUserRequest {
    #[cfg_attr(feature = "docs", schema(example = "Spam in public channels"))]
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: String,

    #[cfg_attr(feature = "docs", schema(example = "1d"))]
    pub duration: String,
}

#[cfg_attr(feature = "docs", derive(IntoParams))]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BanHistoryQuery {
    /// Maximum number of events to return, newest first (1 to 100).
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl BanHistoryQuery {
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}
