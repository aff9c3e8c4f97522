use dashmap::DashSet;

use domain::{ban::BanError, profile::ProfileId};

/// Targets with a ban or unban currently being applied.
#[derive(Debug, Default)]
pub struct InFlightTargets {
    targets: DashSet<ProfileId>,
}

impl InFlightTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, target: ProfileId) -> Result<InFlightGuard<'_>, BanError> {
        if self.targets.insert(target) {
            Ok(InFlightGuard {
                targets: &self.targets,
                target,
            })
        } else {
            Err(BanError::ActionInProgress)
        }
    }

    pub fn is_busy(&self, target: &ProfileId) -> bool {
        self.targets.contains(target)
    }
}

/// Releases the target when dropped, on success and error paths alike.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    targets: &'a DashSet<ProfileId>,
    target: ProfileId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.targets.remove(&self.target);
    }
}
