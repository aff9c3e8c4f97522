use std::collections::BTreeSet;

use crate::perk::ADMIN_PERK;
use crate::profile::{Profile, ProfileId};

/// The authenticated account performing an operation. Built by the incoming
/// adapter from the session and passed into every authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    pub id: ProfileId,
    pub email: String,
    pub display_name: String,
    pub perks: BTreeSet<String>,
}

impl ActorContext {
    pub fn is_admin(&self) -> bool {
        self.perks.contains(ADMIN_PERK)
    }

    pub fn is_self(&self, profile: &Profile) -> bool {
        self.id == profile.id || self.email.eq_ignore_ascii_case(&profile.email)
    }
}

impl From<&Profile> for ActorContext {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
            perks: profile.perks.clone(),
        }
    }
}
