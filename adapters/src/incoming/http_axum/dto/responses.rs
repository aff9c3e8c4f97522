use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
#[cfg(feature = "docs")]
use utoipa::ToSchema;
use uuid::Uuid;

use domain::ban::BanEvent;
use profile_moderation_application::profile::view::ProfileView;

pub(crate) fn format_datetime(dt: OffsetDateTime) -> String {
    dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Standard API response wrapper with success indicator, optional error message, and optional data payload",
    example = json!({
        "ok": true,
        "data": {
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "is_protected": false
        }
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            data: None,
        }
    }

    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct BanNoticeResponse {
    pub reason: Option<String>,
    pub ends_at: Option<String>,
    pub admin_name: Option<String>,
    #[cfg_attr(feature = "docs", schema(example = "2 hours"))]
    pub remaining: Option<String>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Profile with perk badge and ban notice. `email` is only present for the account owner and administrators.",
    example = json!({
        "id": "550e8400-e29b-41d4-a716-446655440000",
        "display_name": "Mira Nova",
        "email": "mira@example.com",
        "perks": ["sponsor"],
        "active_perk": "sponsor",
        "active_perk_label": "Sponsor",
        "active_perk_style": "sponsor",
        "avatar_url": null,
        "created_at": "2024-01-01T00:00:00Z",
        "is_banned": true,
        "ban": {
            "reason": "Spam in public channels",
            "ends_at": "2024-06-02T12:00:00Z",
            "admin_name": "root",
            "remaining": "23 hours"
        }
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub perks: Vec<String>,
    pub active_perk: String,
    pub active_perk_label: String,
    pub active_perk_style: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub is_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban: Option<BanNoticeResponse>,
}

impl ProfileResponse {
    #[must_use]
    pub fn from_view(view: &ProfileView, include_email: bool) -> Self {
        let profile = view.profile();

        let ban = view.is_banned().then(|| BanNoticeResponse {
            reason: view.ban_reason().map(ToString::to_string),
            ends_at: view.ban_ends_at().map(format_datetime),
            admin_name: view.ban_admin_name().map(ToString::to_string),
            remaining: view.remaining_ban_time().map(ToString::to_string),
        });

        Self {
            id: *profile.id.as_uuid(),
            display_name: profile.display_name.clone(),
            email: include_email.then(|| profile.email.clone()),
            perks: profile.perks.iter().cloned().collect(),
            active_perk: profile.active_perk.clone(),
            active_perk_label: view.active_perk_label().to_string(),
            active_perk_style: view.active_perk_style_key().to_string(),
            avatar_url: profile.avatar_url.clone(),
            created_at: format_datetime(profile.created_at),
            is_banned: view.is_banned(),
            ban,
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Audit record of one ban action",
    example = json!({
        "id": "0d5c9d1e-8a55-4f0e-9f0b-1a54b1e6f3c2",
        "user_id": "550e8400-e29b-41d4-a716-446655440000",
        "reason": "Spam in public channels",
        "admin_id": "9b2f4a8e-2c61-4b1e-8d7a-5e3f0c9a1b2d",
        "admin_name": "root",
        "ends_at": null,
        "is_active": true,
        "ban_type": "permanent",
        "created_at": "2024-06-01T12:00:00Z"
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct BanEventResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub admin_id: Uuid,
    pub admin_name: String,
    pub ends_at: Option<String>,
    pub is_active: bool,
    pub ban_type: String,
    pub created_at: String,
}

impl From<BanEvent> for BanEventResponse {
    fn from(event: BanEvent) -> Self {
        Self {
            id: *event.id.as_uuid(),
            user_id: *event.user_id.as_uuid(),
            reason: event.reason,
            admin_id: *event.admin_id.as_uuid(),
            admin_name: event.admin_name,
            ends_at: event.ends_at.map(format_datetime),
            is_active: event.is_active,
            ban_type: event.ban_type.as_str().to_string(),
            created_at: format_datetime(event.created_at),
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct ActiveBanResponse {
    pub ban: Option<BanEventResponse>,
    #[cfg_attr(feature = "docs", schema(example = "permanent"))]
    pub remaining_ban_time: Option<String>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct ProtectionResponse {
    pub user_id: Uuid,
    pub is_protected: bool,
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseValue")]
pub struct ApiResponseValue {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseProfile")]
pub struct ApiResponseProfile {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProfileResponse>,
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseBanHistory")]
pub struct ApiResponseBanHistory {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<BanEventResponse>>,
}
