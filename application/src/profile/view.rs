use time::OffsetDateTime;

use domain::{
    ban::BanEvent,
    ban_time::remaining_ban_time,
    perk::PerkBadge,
    profile::{BanDetails, Profile, ProfileId},
};

/// Read model handed to the presentation layer.
///
/// The profile row decides whether the account is banned. The active ban
/// event only fills in detail columns the row is missing.
#[derive(Debug, Clone)]
pub struct ProfileView {
    profile: Profile,
    active_ban: Option<BanEvent>,
    remaining_ban_time: Option<String>,
}

impl ProfileView {
    pub fn compose(profile: Profile, active_ban: Option<BanEvent>, now: OffsetDateTime) -> Self {
        let active_ban = active_ban
            .filter(|event| profile.is_banned() && event.is_active && event.user_id == profile.id);

        let mut view = Self {
            profile,
            active_ban,
            remaining_ban_time: None,
        };
        if view.is_banned() {
            view.remaining_ban_time = Some(remaining_ban_time(view.ban_ends_at(), now));
        }
        view
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    pub fn active_ban(&self) -> Option<&BanEvent> {
        self.active_ban.as_ref()
    }

    pub fn active_perk_badge(&self) -> PerkBadge {
        PerkBadge::from_tag(&self.profile.active_perk)
    }

    pub fn active_perk_label(&self) -> &'static str {
        self.active_perk_badge().label()
    }

    pub fn active_perk_style_key(&self) -> &'static str {
        self.active_perk_badge().style_key()
    }

    pub fn is_banned(&self) -> bool {
        self.profile.is_banned()
    }

    fn details(&self) -> Option<&BanDetails> {
        self.profile.ban_details()
    }

    pub fn ban_reason(&self) -> Option<&str> {
        self.details()
            .and_then(|details| details.reason.as_deref())
            .or_else(|| self.active_ban.as_ref().map(|event| event.reason.as_str()))
    }

    /// A missing end time on an incomplete row is taken from the event.
    pub fn ban_ends_at(&self) -> Option<OffsetDateTime> {
        let details = self.details()?;
        match (&self.active_ban, details.is_incomplete()) {
            (Some(event), true) => details.ends_at.or(event.ends_at),
            _ => details.ends_at,
        }
    }

    pub fn ban_admin_name(&self) -> Option<&str> {
        self.details()
            .and_then(|details| details.admin_name.as_deref())
            .or_else(|| {
                self.active_ban
                    .as_ref()
                    .map(|event| event.admin_name.as_str())
            })
    }

    pub fn ban_admin_id(&self) -> Option<ProfileId> {
        self.details()
            .and_then(|details| details.admin_id)
            .or_else(|| self.active_ban.as_ref().map(|event| event.admin_id))
    }

    pub fn remaining_ban_time(&self) -> Option<&str> {
        self.remaining_ban_time.as_deref()
    }
}
