use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::perk::PROTECTED_PERKS;
use crate::profile::{BanDetails, Profile, ProfileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BanEventId(pub Uuid);

impl BanEventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BanEventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Durations an administrator may pick when issuing a ban.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BanDuration {
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "permanent")]
    Permanent,
}

impl BanDuration {
    pub const ALL: [Self; 8] = [
        Self::ThirtyMinutes,
        Self::TwoHours,
        Self::SixHours,
        Self::TwelveHours,
        Self::OneDay,
        Self::ThreeDays,
        Self::OneWeek,
        Self::Permanent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThirtyMinutes => "30m",
            Self::TwoHours => "2h",
            Self::SixHours => "6h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
            Self::ThreeDays => "3d",
            Self::OneWeek => "1w",
            Self::Permanent => "permanent",
        }
    }

    /// `None` for a permanent ban.
    pub fn length(self) -> Option<Duration> {
        match self {
            Self::ThirtyMinutes => Some(Duration::minutes(30)),
            Self::TwoHours => Some(Duration::hours(2)),
            Self::SixHours => Some(Duration::hours(6)),
            Self::TwelveHours => Some(Duration::hours(12)),
            Self::OneDay => Some(Duration::days(1)),
            Self::ThreeDays => Some(Duration::days(3)),
            Self::OneWeek => Some(Duration::weeks(1)),
            Self::Permanent => None,
        }
    }

    pub fn ends_at(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        self.length().map(|length| now + length)
    }

    pub fn ban_type(self) -> BanType {
        match self {
            Self::Permanent => BanType::Permanent,
            _ => BanType::Temporary,
        }
    }
}

impl fmt::Display for BanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BanDuration {
    type Err = BanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|duration| duration.as_str() == s)
            .ok_or_else(|| BanError::InvalidDuration(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BanType {
    Temporary,
    Permanent,
}

impl BanType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temporary => "temporary",
            Self::Permanent => "permanent",
        }
    }

    pub fn from_ends_at(ends_at: Option<OffsetDateTime>) -> Self {
        if ends_at.is_some() {
            Self::Temporary
        } else {
            Self::Permanent
        }
    }
}

impl FromStr for BanType {
    type Err = BanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temporary" => Ok(Self::Temporary),
            "permanent" => Ok(Self::Permanent),
            other => Err(BanError::InvalidBanType(other.to_string())),
        }
    }
}

/// Audit record of one ban action. At most one event per user is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanEvent {
    pub id: BanEventId,
    pub user_id: ProfileId,
    pub reason: String,
    pub admin_id: ProfileId,
    pub admin_name: String,
    pub ends_at: Option<OffsetDateTime>,
    pub is_active: bool,
    pub ban_type: BanType,
    pub created_at: OffsetDateTime,
}

impl BanEvent {
    pub fn issue(
        user_id: ProfileId,
        admin: &ActorContext,
        reason: String,
        ends_at: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id: BanEventId::new(),
            user_id,
            reason,
            admin_id: admin.id,
            admin_name: admin.display_name.clone(),
            ends_at,
            is_active: true,
            ban_type: BanType::from_ends_at(ends_at),
            created_at: now,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.ban_type == BanType::Permanent
    }

    pub fn details(&self) -> BanDetails {
        BanDetails::new(
            self.reason.clone(),
            self.ends_at,
            self.admin_name.clone(),
            self.admin_id,
        )
    }
}

/// Self, administrators and developers can never be banned.
pub fn is_protected(actor: &ActorContext, target: &Profile) -> bool {
    actor.is_self(target) || PROTECTED_PERKS.iter().any(|perk| target.has_perk(perk))
}

/// Trimmed ban reason, rejecting blank input.
pub fn normalize_reason(reason: &str) -> Result<String, BanError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(BanError::EmptyReason);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BanError {
    #[error("Ban reason cannot be empty")]
    EmptyReason,
    #[error("Invalid ban duration: {0}")]
    InvalidDuration(String),
    #[error("Invalid ban type: {0}")]
    InvalidBanType(String),
    #[error("This user is protected and cannot be banned")]
    ProtectedTarget,
    #[error("Only admins can moderate users")]
    InsufficientPermissions,
    #[error("A moderation action for this user is already in progress")]
    ActionInProgress,
}
