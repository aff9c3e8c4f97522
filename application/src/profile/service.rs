use time::OffsetDateTime;

use crate::auth::password_validator::PasswordValidator;
use crate::error::{AppError, AppResult};
use crate::ports::incoming::moderation::DynModerationUseCase;
use crate::ports::incoming::profile::ProfileUseCase;
use crate::ports::outgoing::password_hasher::DynPasswordHasherPort;
use crate::ports::outgoing::profile_store::DynProfileStorePort;
use crate::profile::view::ProfileView;
use domain::{
    actor::ActorContext,
    error::DomainError,
    profile::{Profile, ProfileId, normalize_display_name},
};

pub const MAX_AVATAR_URL_BYTES: usize = 2048;

pub struct ProfileService {
    profile_store: DynProfileStorePort,
    moderation: DynModerationUseCase,
    password_hasher: DynPasswordHasherPort,
    password_validator: PasswordValidator,
}

impl ProfileService {
    pub fn new(
        profile_store: DynProfileStorePort,
        moderation: DynModerationUseCase,
        password_hasher: DynPasswordHasherPort,
        password_validator: PasswordValidator,
    ) -> Self {
        Self {
            profile_store,
            moderation,
            password_hasher,
            password_validator,
        }
    }

    async fn load_profile(&self, id: &ProfileId) -> AppResult<Profile> {
        self.profile_store
            .find_profile_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                message: format!("Profile {id} not found"),
            })
    }

    /// Loads the actor's own profile and refuses banned accounts.
    async fn load_editable(&self, actor: &ActorContext) -> AppResult<Profile> {
        let profile = self.load_profile(&actor.id).await?;
        if profile.is_banned() {
            return Err(AppError::Forbidden {
                message: "Banned accounts cannot edit their profile".to_string(),
            });
        }
        Ok(profile)
    }
}

fn validate_avatar_url(avatar_url: &str) -> AppResult<String> {
    let avatar_url = avatar_url.trim();

    if avatar_url.len() > MAX_AVATAR_URL_BYTES {
        return Err(DomainError::InvalidAvatarUrl(format!(
            "must be at most {MAX_AVATAR_URL_BYTES} bytes"
        ))
        .into());
    }

    let parsed = url::Url::parse(avatar_url)
        .map_err(|e| DomainError::InvalidAvatarUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(
            DomainError::InvalidAvatarUrl("must be an absolute http(s) URL".to_string()).into(),
        );
    }

    Ok(avatar_url.to_string())
}

#[async_trait::async_trait]
impl ProfileUseCase for ProfileService {
    async fn get_profile_view(
        &self,
        id: &ProfileId,
        now: OffsetDateTime,
    ) -> AppResult<ProfileView> {
        let profile = self.load_profile(id).await?;

        let needs_enrichment = profile
            .ban_details()
            .is_some_and(|details| details.is_incomplete());

        let active_ban = if needs_enrichment {
            self.moderation.load_active_ban(id).await?
        } else {
            None
        };

        Ok(ProfileView::compose(profile, active_ban, now))
    }

    async fn update_display_name(
        &self,
        actor: &ActorContext,
        display_name: &str,
    ) -> AppResult<Profile> {
        let display_name = normalize_display_name(display_name)?;
        self.load_editable(actor).await?;

        let profile = self
            .profile_store
            .update_display_name(&actor.id, &display_name)
            .await?;

        tracing::info!(user_id = %actor.id, "Display name updated");
        Ok(profile)
    }

    async fn change_password(
        &self,
        actor: &ActorContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        self.load_editable(actor).await?;

        let password_hash = self
            .profile_store
            .find_password_hash(&actor.id)
            .await?
            .ok_or_else(|| AppError::ValidationError {
                message: "Account does not support local login".to_string(),
            })?;

        if !self
            .password_hasher
            .verify(current_password, &password_hash)?
        {
            return Err(AppError::ValidationError {
                message: "Current password is incorrect".to_string(),
            });
        }

        if current_password == new_password {
            return Err(AppError::ValidationError {
                message: "New password must differ from the current password".to_string(),
            });
        }

        self.password_validator
            .validate(new_password, &[actor.email.as_str(), actor.display_name.as_str()])?;

        let new_hash = self.password_hasher.hash(new_password)?;
        self.profile_store
            .update_password_hash(&actor.id, &new_hash)
            .await?;

        tracing::info!(user_id = %actor.id, "Password changed");
        Ok(())
    }

    async fn select_perk(&self, actor: &ActorContext, perk: &str) -> AppResult<Profile> {
        let profile = self.load_editable(actor).await?;

        if !profile.can_select_perk(perk) {
            return Err(DomainError::PerkNotGranted(perk.to_string()).into());
        }

        self.profile_store
            .update_active_perk(&actor.id, perk)
            .await
    }

    async fn change_avatar(&self, actor: &ActorContext, avatar_url: &str) -> AppResult<Profile> {
        let avatar_url = validate_avatar_url(avatar_url)?;
        self.load_editable(actor).await?;

        self.profile_store
            .update_avatar(&actor.id, &avatar_url)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use time::{Duration, macros::datetime};

    use super::*;
    use crate::moderation::service::ModerationService;
    use crate::ports::incoming::moderation::ModerationUseCase;
    use crate::testing::{
        InMemoryBanEventStore, InMemoryProfileStore, PlainTextHasher, actor_for, admin_profile,
        member_profile,
    };
    use domain::ban::{BanDuration, BanEvent};
    use domain::profile::{BanDetails, ModerationState};

    const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);
    const STRONG_PASSWORD: &str = "vivid-Lantern-93-orchard-Pebble";

    struct Fixture {
        profiles: Arc<InMemoryProfileStore>,
        events: Arc<InMemoryBanEventStore>,
        moderation: Arc<ModerationService>,
        service: ProfileService,
        member: Profile,
    }

    fn fixture() -> Fixture {
        let profiles = Arc::new(InMemoryProfileStore::default());
        let events = Arc::new(InMemoryBanEventStore::default());
        let moderation = Arc::new(ModerationService::new(
            Arc::clone(&profiles) as _,
            Arc::clone(&events) as _,
        ));

        let member = member_profile("mira", "mira@example.com");
        profiles.insert_with_password(member.clone(), "plain$hunter2");
        profiles.insert(admin_profile());

        let service = ProfileService::new(
            Arc::clone(&profiles) as _,
            Arc::clone(&moderation) as _,
            Arc::new(PlainTextHasher),
            PasswordValidator::new(),
        );

        Fixture {
            profiles,
            events,
            moderation,
            service,
            member,
        }
    }

    fn ban_in_store(f: &Fixture, details: BanDetails) {
        let mut banned = f.member.clone();
        banned.moderation = ModerationState::Banned(details);
        f.profiles.insert(banned);
    }

    #[tokio::test]
    async fn view_of_active_profile_skips_event_lookup() {
        let f = fixture();
        let admin = actor_for(&admin_profile());
        f.events.seed(BanEvent::issue(
            f.member.id,
            &admin,
            "stale".to_string(),
            None,
            NOW,
        ));

        let view = f.service.get_profile_view(&f.member.id, NOW).await.unwrap();
        assert!(!view.is_banned());
        assert!(view.ban_reason().is_none());
    }

    #[tokio::test]
    async fn view_enriches_incomplete_ban_from_active_event() {
        let f = fixture();
        let admin = actor_for(&admin_profile());
        ban_in_store(
            &f,
            BanDetails {
                reason: None,
                ends_at: None,
                admin_name: None,
                admin_id: None,
            },
        );
        f.events.seed(BanEvent::issue(
            f.member.id,
            &admin,
            "spam".to_string(),
            Some(NOW + Duration::hours(5)),
            NOW,
        ));

        let view = f.service.get_profile_view(&f.member.id, NOW).await.unwrap();
        assert_eq!(view.ban_reason(), Some("spam"));
        assert_eq!(view.ban_admin_name(), Some("root"));
        assert_eq!(view.remaining_ban_time(), Some("5 hours"));
    }

    #[tokio::test]
    async fn view_after_real_ban_shows_remaining_time() {
        let f = fixture();
        let admin = actor_for(&admin_profile());
        f.moderation
            .ban(&admin, &f.member.id, "spam", BanDuration::Permanent)
            .await
            .unwrap();

        let view = f
            .service
            .get_profile_view(&f.member.id, OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert!(view.is_banned());
        assert_eq!(view.remaining_ban_time(), Some("permanent"));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let f = fixture();
        let result = f.service.get_profile_view(&ProfileId::new(), NOW).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn display_name_is_trimmed_and_stored() {
        let f = fixture();
        let actor = actor_for(&f.member);

        let profile = f
            .service
            .update_display_name(&actor, "  Mira Nova  ")
            .await
            .unwrap();
        assert_eq!(profile.display_name, "Mira Nova");
    }

    #[tokio::test]
    async fn invalid_display_name_is_rejected() {
        let f = fixture();
        let actor = actor_for(&f.member);

        let too_long = "y".repeat(33);
        for name in ["ab", "  x ", "bad\u{7}name", too_long.as_str()] {
            let result = f.service.update_display_name(&actor, name).await;
            assert!(
                matches!(result, Err(AppError::Domain(DomainError::InvalidDisplayName(_)))),
                "{name:?}"
            );
        }
        assert_eq!(f.profiles.get(&f.member.id).unwrap().display_name, "mira");
    }

    #[tokio::test]
    async fn banned_account_cannot_edit_profile() {
        let f = fixture();
        ban_in_store(
            &f,
            BanDetails::new("spam".to_string(), None, "root".to_string(), ProfileId::new()),
        );
        let actor = actor_for(&f.member);

        let result = f.service.update_display_name(&actor, "New Name").await;
        assert!(matches!(result, Err(AppError::Forbidden { .. })));

        let result = f
            .service
            .change_avatar(&actor, "https://cdn.example.com/a.png")
            .await;
        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn password_change_stores_new_hash() {
        let f = fixture();
        let actor = actor_for(&f.member);

        f.service
            .change_password(&actor, "hunter2", STRONG_PASSWORD)
            .await
            .unwrap();

        assert_eq!(
            f.profiles.password_hash(&f.member.id),
            Some(format!("plain${STRONG_PASSWORD}"))
        );
    }

    #[tokio::test]
    async fn password_change_requires_current_password() {
        let f = fixture();
        let actor = actor_for(&f.member);

        let result = f
            .service
            .change_password(&actor, "wrong", STRONG_PASSWORD)
            .await;
        assert!(matches!(result, Err(AppError::ValidationError { .. })));
        assert_eq!(
            f.profiles.password_hash(&f.member.id).as_deref(),
            Some("plain$hunter2")
        );
    }

    #[tokio::test]
    async fn password_change_rejects_weak_or_unchanged_password() {
        let f = fixture();
        let actor = actor_for(&f.member);

        let weak = f.service.change_password(&actor, "hunter2", "password1").await;
        assert!(matches!(weak, Err(AppError::ValidationError { .. })));

        let same = f.service.change_password(&actor, "hunter2", "hunter2").await;
        assert!(matches!(same, Err(AppError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn password_change_needs_local_password() {
        let f = fixture();
        let social = member_profile("social", "social@example.com");
        f.profiles.insert(social.clone());

        let result = f
            .service
            .change_password(&actor_for(&social), "anything", STRONG_PASSWORD)
            .await;
        assert!(matches!(result, Err(AppError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn perk_selection_requires_grant() {
        let f = fixture();
        let actor = actor_for(&f.member);

        let result = f.service.select_perk(&actor, "sponsor").await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::PerkNotGranted(_)))
        ));

        let mut sponsor = f.member.clone();
        sponsor.perks.insert("sponsor".to_string());
        f.profiles.insert(sponsor);

        let profile = f.service.select_perk(&actor, "sponsor").await.unwrap();
        assert_eq!(profile.active_perk, "sponsor");

        let profile = f.service.select_perk(&actor, "default-user").await.unwrap();
        assert_eq!(profile.active_perk, "default-user");
    }

    #[tokio::test]
    async fn avatar_must_be_http_url() {
        let f = fixture();
        let actor = actor_for(&f.member);

        let profile = f
            .service
            .change_avatar(&actor, "https://cdn.example.com/avatars/7.png")
            .await
            .unwrap();
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.example.com/avatars/7.png")
        );

        let too_long = format!("https://cdn.example.com/{}", "a".repeat(MAX_AVATAR_URL_BYTES));
        for url in [
            "javascript:alert(1)",
            "not a url",
            "ftp://example.com/a.png",
            too_long.as_str(),
        ] {
            let result = f.service.change_avatar(&actor, url).await;
            assert!(
                matches!(result, Err(AppError::Domain(DomainError::InvalidAvatarUrl(_)))),
                "{url}"
            );
        }
    }
}
