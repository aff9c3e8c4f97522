use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::moderation::in_flight::InFlightTargets;
use crate::ports::incoming::moderation::ModerationUseCase;
use crate::ports::outgoing::ban_event_store::DynBanEventStorePort;
use crate::ports::outgoing::profile_store::DynProfileStorePort;
use domain::{
    actor::ActorContext,
    ban::{BanDuration, BanError, BanEvent, is_protected, normalize_reason},
    profile::{BanDetails, ModerationState, Profile, ProfileId},
};

pub const MAX_HISTORY_LIMIT: u32 = 100;

/// A secondary audit write failed after the profile, which is authoritative,
/// was already updated. Logged, never returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ConsistencyWarning {
    #[error("ban applied but previous ban events are still active: {source}")]
    StaleActiveEvents { source: AppError },

    #[error("ban applied but its audit event was not recorded: {source}")]
    MissingAuditEvent { source: AppError },

    #[error("unban applied but ban events are still active: {source}")]
    UnbanNotRecorded { source: AppError },
}

fn report_inconsistency(user_id: &ProfileId, warning: &ConsistencyWarning) {
    tracing::warn!(
        user_id = %user_id,
        warning = %warning,
        "Ban audit trail diverged from profile state"
    );
}

pub struct ModerationService {
    profile_store: DynProfileStorePort,
    ban_event_store: DynBanEventStorePort,
    in_flight: InFlightTargets,
}

impl ModerationService {
    pub fn new(profile_store: DynProfileStorePort, ban_event_store: DynBanEventStorePort) -> Self {
        Self {
            profile_store,
            ban_event_store,
            in_flight: InFlightTargets::new(),
        }
    }

    fn require_admin(actor: &ActorContext) -> AppResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(BanError::InsufficientPermissions.into())
        }
    }

    async fn load_target(&self, target_id: &ProfileId) -> AppResult<Profile> {
        self.profile_store
            .find_profile_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                message: format!("Profile {target_id} not found"),
            })
    }

    /// Rotates the active audit event. A new event is only inserted once the
    /// previous ones are deactivated so that at most one stays active.
    async fn record_ban_event(&self, event: BanEvent) {
        let user_id = event.user_id;

        if let Err(source) = self
            .ban_event_store
            .deactivate_active_ban_events(&user_id)
            .await
        {
            report_inconsistency(&user_id, &ConsistencyWarning::StaleActiveEvents { source });
            return;
        }

        if let Err(source) = self.ban_event_store.insert_ban_event(&event).await {
            report_inconsistency(&user_id, &ConsistencyWarning::MissingAuditEvent { source });
        }
    }
}

#[async_trait::async_trait]
impl ModerationUseCase for ModerationService {
    async fn is_protected(&self, actor: &ActorContext, target_id: &ProfileId) -> AppResult<bool> {
        let target = self.load_target(target_id).await?;
        Ok(is_protected(actor, &target))
    }

    async fn ban(
        &self,
        actor: &ActorContext,
        target_id: &ProfileId,
        reason: &str,
        duration: BanDuration,
    ) -> AppResult<Profile> {
        Self::require_admin(actor)?;
        let reason = normalize_reason(reason)?;

        let _guard = self.in_flight.try_acquire(*target_id)?;

        let target = self.load_target(target_id).await?;
        if is_protected(actor, &target) {
            tracing::warn!(
                user_id = %target_id,
                admin_id = %actor.id,
                "Rejected ban of protected user"
            );
            return Err(BanError::ProtectedTarget.into());
        }

        let now = OffsetDateTime::now_utc();
        let ends_at = duration.ends_at(now);
        let details = BanDetails::new(reason.clone(), ends_at, actor.display_name.clone(), actor.id);

        let profile = self
            .profile_store
            .update_moderation(target_id, &ModerationState::Banned(details))
            .await?;

        self.record_ban_event(BanEvent::issue(*target_id, actor, reason, ends_at, now))
            .await;

        tracing::info!(
            user_id = %target_id,
            admin_id = %actor.id,
            duration = %duration,
            "User banned"
        );

        Ok(profile)
    }

    async fn unban(&self, actor: &ActorContext, target_id: &ProfileId) -> AppResult<Profile> {
        Self::require_admin(actor)?;

        let _guard = self.in_flight.try_acquire(*target_id)?;

        let target = self.load_target(target_id).await?;
        let was_banned = target.is_banned();

        let profile = if was_banned {
            self.profile_store
                .update_moderation(target_id, &ModerationState::Active)
                .await?
        } else {
            target
        };

        // Also clears events left active on an already active profile.
        if let Err(source) = self
            .ban_event_store
            .deactivate_active_ban_events(target_id)
            .await
        {
            report_inconsistency(target_id, &ConsistencyWarning::UnbanNotRecorded { source });
        }

        tracing::info!(
            user_id = %target_id,
            admin_id = %actor.id,
            was_banned,
            "User unbanned"
        );

        Ok(profile)
    }

    async fn load_active_ban(&self, user_id: &ProfileId) -> AppResult<Option<BanEvent>> {
        self.ban_event_store
            .find_latest_active_ban_event(user_id)
            .await
    }

    async fn ban_history(
        &self,
        actor: &ActorContext,
        user_id: &ProfileId,
        limit: u32,
    ) -> AppResult<Vec<BanEvent>> {
        Self::require_admin(actor)?;

        self.ban_event_store
            .list_ban_events(user_id, limit.clamp(1, MAX_HISTORY_LIMIT))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use time::Duration;

    use super::*;
    use crate::testing::{
        InMemoryBanEventStore, InMemoryProfileStore, actor_for, admin_profile, member_profile,
    };
    use domain::ban::BanType;
    use domain::ban_time::remaining_ban_time;

    struct Fixture {
        profiles: Arc<InMemoryProfileStore>,
        events: Arc<InMemoryBanEventStore>,
        service: ModerationService,
        admin: ActorContext,
        member: Profile,
    }

    fn fixture() -> Fixture {
        let profiles = Arc::new(InMemoryProfileStore::default());
        let events = Arc::new(InMemoryBanEventStore::default());

        let admin = admin_profile();
        let member = member_profile("spammer", "spammer@example.com");
        profiles.insert(admin.clone());
        profiles.insert(member.clone());

        let service = ModerationService::new(Arc::clone(&profiles) as _, Arc::clone(&events) as _);

        Fixture {
            profiles,
            events,
            service,
            admin: actor_for(&admin),
            member,
        }
    }

    fn assert_moderation_invariant(profile: &Profile) {
        if let Some(details) = profile.ban_details() {
            assert!(!details.is_incomplete(), "banned profile is missing details");
        } else {
            assert_eq!(profile.moderation, ModerationState::Active);
        }
    }

    #[tokio::test]
    async fn temporary_ban_sets_profile_and_records_event() {
        let fx = fixture();
        let before = OffsetDateTime::now_utc();

        let profile = fx
            .service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await
            .unwrap();

        assert!(profile.is_banned());
        assert_moderation_invariant(&profile);
        let details = profile.ban_details().unwrap();
        assert_eq!(details.reason.as_deref(), Some("spam"));
        assert_eq!(details.admin_name.as_deref(), Some("root"));
        assert_eq!(details.admin_id, Some(fx.admin.id));

        let ends_at = details.ends_at.unwrap();
        let expected = before + Duration::days(1);
        assert!((ends_at - expected).abs() < Duration::seconds(5));

        let active = fx.events.active_events_for(&fx.member.id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].ban_type, BanType::Temporary);
        assert_eq!(active[0].reason, "spam");
        assert_eq!(active[0].ends_at, Some(ends_at));
    }

    #[tokio::test]
    async fn rebanning_deactivates_previous_event() {
        let fx = fixture();

        fx.service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::TwoHours)
            .await
            .unwrap();
        fx.service
            .ban(&fx.admin, &fx.member.id, "more spam", BanDuration::OneWeek)
            .await
            .unwrap();

        let all = fx.events.events_for(&fx.member.id);
        assert_eq!(all.len(), 2);

        let active = fx.events.active_events_for(&fx.member.id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].reason, "more spam");
    }

    #[tokio::test]
    async fn permanent_ban_has_no_end_time() {
        let fx = fixture();

        let profile = fx
            .service
            .ban(&fx.admin, &fx.member.id, "ban evasion", BanDuration::Permanent)
            .await
            .unwrap();

        let details = profile.ban_details().unwrap();
        assert_eq!(details.ends_at, None);
        let far_future = OffsetDateTime::now_utc() + Duration::days(3650);
        assert_eq!(remaining_ban_time(details.ends_at, far_future), "permanent");

        let active = fx.events.active_events_for(&fx.member.id);
        assert_eq!(active[0].ban_type, BanType::Permanent);
    }

    #[tokio::test]
    async fn ban_then_unban_clears_every_field() {
        for duration in BanDuration::ALL {
            let fx = fixture();

            fx.service
                .ban(&fx.admin, &fx.member.id, "spam", duration)
                .await
                .unwrap();
            let profile = fx.service.unban(&fx.admin, &fx.member.id).await.unwrap();

            assert!(!profile.is_banned(), "duration {duration}");
            assert!(profile.ban_details().is_none());
            assert_moderation_invariant(&profile);
            assert!(fx.events.active_events_for(&fx.member.id).is_empty());
            assert_eq!(fx.events.events_for(&fx.member.id).len(), 1);
        }
    }

    #[tokio::test]
    async fn unbanning_an_active_profile_leaves_it_untouched() {
        let fx = fixture();

        let profile = fx.service.unban(&fx.admin, &fx.member.id).await.unwrap();

        assert!(!profile.is_banned());
        assert_eq!(profile, fx.member);
        assert_eq!(fx.profiles.moderation_write_count(), 0);
        assert!(fx.events.events_for(&fx.member.id).is_empty());
    }

    #[tokio::test]
    async fn repeated_unban_clears_events_left_active_by_failed_deactivation() {
        let fx = fixture();
        fx.service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await
            .unwrap();

        fx.events.fail_deactivation(true);
        fx.service.unban(&fx.admin, &fx.member.id).await.unwrap();
        assert_eq!(fx.events.active_events_for(&fx.member.id).len(), 1);

        fx.events.fail_deactivation(false);
        let profile = fx.service.unban(&fx.admin, &fx.member.id).await.unwrap();

        assert!(!profile.is_banned());
        assert!(fx.events.active_events_for(&fx.member.id).is_empty());
        assert_eq!(fx.profiles.moderation_write_count(), 2);
    }

    #[tokio::test]
    async fn protected_targets_are_rejected_without_writes() {
        let fx = fixture();

        let mut developer = member_profile("dev", "dev@example.com");
        developer.perks.insert("developer".to_string());
        fx.profiles.insert(developer.clone());

        let mut other_admin = member_profile("mod", "mod@example.com");
        other_admin.perks.insert("admin".to_string());
        fx.profiles.insert(other_admin.clone());

        for target in [developer.id, other_admin.id, fx.admin.id] {
            let result = fx
                .service
                .ban(&fx.admin, &target, "spam", BanDuration::OneDay)
                .await;
            assert!(matches!(result, Err(AppError::Forbidden { .. })));
        }

        assert_eq!(fx.profiles.moderation_write_count(), 0);
        assert_eq!(fx.events.write_count(), 0);
    }

    #[tokio::test]
    async fn is_protected_reports_same_email_and_staff_perks() {
        let fx = fixture();

        assert!(fx.service.is_protected(&fx.admin, &fx.admin.id).await.unwrap());
        assert!(
            !fx.service
                .is_protected(&fx.admin, &fx.member.id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn non_admin_cannot_ban_or_unban() {
        let fx = fixture();
        let bystander = member_profile("bystander", "bystander@example.com");
        fx.profiles.insert(bystander.clone());
        let actor = actor_for(&bystander);

        let ban = fx
            .service
            .ban(&actor, &fx.member.id, "spam", BanDuration::OneDay)
            .await;
        assert!(matches!(ban, Err(AppError::Forbidden { .. })));

        let unban = fx.service.unban(&actor, &fx.member.id).await;
        assert!(matches!(unban, Err(AppError::Forbidden { .. })));

        assert_eq!(fx.profiles.moderation_write_count(), 0);
    }

    #[tokio::test]
    async fn blank_reason_is_a_validation_error() {
        let fx = fixture();

        let result = fx
            .service
            .ban(&fx.admin, &fx.member.id, "   ", BanDuration::OneDay)
            .await;

        assert!(matches!(result, Err(AppError::ValidationError { .. })));
        assert_eq!(fx.profiles.moderation_write_count(), 0);
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let fx = fixture();

        let result = fx
            .service
            .ban(&fx.admin, &ProfileId::new(), "spam", BanDuration::OneDay)
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn failed_profile_write_leaves_no_event() {
        let fx = fixture();
        fx.profiles.fail_moderation_writes(true);

        let result = fx
            .service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await;

        assert!(matches!(result, Err(AppError::DatabaseError { .. })));
        assert!(fx.events.events_for(&fx.member.id).is_empty());
        assert!(!fx.profiles.get(&fx.member.id).unwrap().is_banned());
    }

    #[tokio::test]
    async fn failed_event_write_still_bans() {
        let fx = fixture();
        fx.events.fail_inserts(true);

        let profile = fx
            .service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::SixHours)
            .await
            .unwrap();

        assert!(profile.is_banned());
        assert!(fx.events.events_for(&fx.member.id).is_empty());
    }

    #[tokio::test]
    async fn failed_deactivation_skips_new_event() {
        let fx = fixture();
        fx.service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::TwoHours)
            .await
            .unwrap();

        fx.events.fail_deactivation(true);
        let profile = fx
            .service
            .ban(&fx.admin, &fx.member.id, "again", BanDuration::OneDay)
            .await
            .unwrap();

        assert_eq!(
            profile.ban_details().unwrap().reason.as_deref(),
            Some("again")
        );
        let active = fx.events.active_events_for(&fx.member.id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].reason, "spam");
    }

    #[tokio::test]
    async fn failed_deactivation_does_not_undo_unban() {
        let fx = fixture();
        fx.service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await
            .unwrap();
        fx.events.fail_deactivation(true);

        let profile = fx.service.unban(&fx.admin, &fx.member.id).await.unwrap();

        assert!(!profile.is_banned());
        assert_eq!(fx.events.active_events_for(&fx.member.id).len(), 1);
    }

    #[tokio::test]
    async fn concurrent_action_on_same_target_is_rejected() {
        let fx = fixture();

        let guard = fx.service.in_flight.try_acquire(fx.member.id).unwrap();
        let result = fx
            .service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
        let result = fx.service.unban(&fx.admin, &fx.member.id).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
        drop(guard);

        fx.service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await
            .unwrap();
        assert!(!fx.service.in_flight.is_busy(&fx.member.id));
    }

    #[tokio::test]
    async fn guard_is_released_after_failure() {
        let fx = fixture();
        fx.profiles.fail_moderation_writes(true);

        let result = fx
            .service
            .ban(&fx.admin, &fx.member.id, "spam", BanDuration::OneDay)
            .await;
        assert!(result.is_err());
        assert!(!fx.service.in_flight.is_busy(&fx.member.id));
    }

    #[tokio::test]
    async fn load_active_ban_returns_newest_active_event() {
        let fx = fixture();
        assert!(
            fx.service
                .load_active_ban(&fx.member.id)
                .await
                .unwrap()
                .is_none()
        );

        fx.service
            .ban(&fx.admin, &fx.member.id, "first", BanDuration::TwoHours)
            .await
            .unwrap();
        fx.service
            .ban(&fx.admin, &fx.member.id, "second", BanDuration::ThreeDays)
            .await
            .unwrap();

        let active = fx
            .service
            .load_active_ban(&fx.member.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.reason, "second");
    }

    #[tokio::test]
    async fn history_is_admin_only_and_newest_first() {
        let fx = fixture();
        fx.service
            .ban(&fx.admin, &fx.member.id, "first", BanDuration::TwoHours)
            .await
            .unwrap();
        fx.service
            .ban(&fx.admin, &fx.member.id, "second", BanDuration::OneDay)
            .await
            .unwrap();

        let history = fx
            .service
            .ban_history(&fx.admin, &fx.member.id, 10)
            .await
            .unwrap();
        let reasons: Vec<_> = history.iter().map(|event| event.reason.as_str()).collect();
        assert_eq!(reasons, ["second", "first"]);

        let member = actor_for(&fx.member);
        let denied = fx.service.ban_history(&member, &fx.member.id, 10).await;
        assert!(matches!(denied, Err(AppError::Forbidden { .. })));
    }
}
