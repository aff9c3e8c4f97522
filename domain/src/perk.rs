pub const DEFAULT_PERK: &str = "default-user";
pub const EARLY_ADOPTER_PERK: &str = "early-adopter";
pub const SPONSOR_PERK: &str = "sponsor";
pub const ADMIN_PERK: &str = "admin";
pub const DEVELOPER_PERK: &str = "developer";

/// Perks that make an account immune to moderation actions.
pub const PROTECTED_PERKS: [&str; 2] = [ADMIN_PERK, DEVELOPER_PERK];

/// Display badge derived from the active perk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerkBadge {
    DefaultUser,
    EarlyAdopter,
    Sponsor,
    Admin,
}

impl PerkBadge {
    /// Unknown tags (including `developer`) render as the default badge.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            EARLY_ADOPTER_PERK => Self::EarlyAdopter,
            SPONSOR_PERK => Self::Sponsor,
            ADMIN_PERK => Self::Admin,
            _ => Self::DefaultUser,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DefaultUser => "User",
            Self::EarlyAdopter => "Early Adopter",
            Self::Sponsor => "Sponsor",
            Self::Admin => "Admin",
        }
    }

    pub fn style_key(self) -> &'static str {
        match self {
            Self::DefaultUser => DEFAULT_PERK,
            Self::EarlyAdopter => EARLY_ADOPTER_PERK,
            Self::Sponsor => SPONSOR_PERK,
            Self::Admin => ADMIN_PERK,
        }
    }
}
