use std::collections::BTreeSet;
use std::fmt;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::perk::DEFAULT_PERK;

pub const DISPLAY_NAME_MIN_CHARS: usize = 3;
pub const DISPLAY_NAME_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
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

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ban detail columns as stored on the profile row.
///
/// Every field is optional because rows written by older clients may carry
/// `is_banned = true` without the detail columns. `ends_at = None` means the
/// ban is permanent only when the details are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanDetails {
    pub reason: Option<String>,
    pub ends_at: Option<OffsetDateTime>,
    pub admin_name: Option<String>,
    pub admin_id: Option<ProfileId>,
}

impl BanDetails {
    pub fn new(
        reason: String,
        ends_at: Option<OffsetDateTime>,
        admin_name: String,
        admin_id: ProfileId,
    ) -> Self {
        Self {
            reason: Some(reason),
            ends_at,
            admin_name: Some(admin_name),
            admin_id: Some(admin_id),
        }
    }

    /// True when the row is missing the columns an audit record would supply.
    pub fn is_incomplete(&self) -> bool {
        self.reason.is_none() || self.admin_name.is_none() || self.admin_id.is_none()
    }
}

/// Moderation axis of a profile. Only `Banned` carries ban details, so an
/// active profile can never hold a stale reason or end time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModerationState {
    #[default]
    Active,
    Banned(BanDetails),
}

impl ModerationState {
    pub fn is_banned(&self) -> bool {
        matches!(self, Self::Banned(_))
    }

    pub fn details(&self) -> Option<&BanDetails> {
        match self {
            Self::Active => None,
            Self::Banned(details) => Some(details),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub display_name: String,
    pub email: String,
    pub perks: BTreeSet<String>,
    pub active_perk: String,
    pub avatar_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub moderation: ModerationState,
}

impl Profile {
    pub fn has_perk(&self, tag: &str) -> bool {
        self.perks.contains(tag)
    }

    /// A perk can be worn when it was granted or when it is the default tag.
    pub fn can_select_perk(&self, tag: &str) -> bool {
        tag == DEFAULT_PERK || self.has_perk(tag)
    }

    pub fn is_banned(&self) -> bool {
        self.moderation.is_banned()
    }

    pub fn ban_details(&self) -> Option<&BanDetails> {
        self.moderation.details()
    }
}

/// Trimmed display name, or the reason it cannot be used.
pub fn normalize_display_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    let char_count = trimmed.chars().count();

    if char_count < DISPLAY_NAME_MIN_CHARS || char_count > DISPLAY_NAME_MAX_CHARS {
        return Err(DomainError::InvalidDisplayName(format!(
            "must be between {DISPLAY_NAME_MIN_CHARS} and {DISPLAY_NAME_MAX_CHARS} characters"
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(DomainError::InvalidDisplayName(
            "must not contain control characters".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
