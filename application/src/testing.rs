//! In-memory store fakes shared by the service tests.
#![allow(clippy::unwrap_used)]

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::{
    ban_event_store::BanEventStorePort,
    password_hasher::PasswordHasherPort,
    profile_store::{ProfileCredentials, ProfileStorePort},
};
use domain::{
    actor::ActorContext,
    ban::BanEvent,
    perk::{ADMIN_PERK, DEFAULT_PERK},
    profile::{ModerationState, Profile, ProfileId},
};

pub fn member_profile(display_name: &str, email: &str) -> Profile {
    Profile {
        id: ProfileId::new(),
        display_name: display_name.to_string(),
        email: email.to_string(),
        perks: BTreeSet::new(),
        active_perk: DEFAULT_PERK.to_string(),
        avatar_url: None,
        created_at: OffsetDateTime::now_utc(),
        moderation: ModerationState::Active,
    }
}

pub fn admin_profile() -> Profile {
    let mut profile = member_profile("root", "root@example.com");
    profile.perks.insert(ADMIN_PERK.to_string());
    profile
}

pub fn actor_for(profile: &Profile) -> ActorContext {
    ActorContext::from(profile)
}

fn store_failure(operation: &str) -> AppError {
    AppError::DatabaseError {
        message: format!("{operation}: injected failure"),
    }
}

fn missing_profile(id: &ProfileId) -> AppError {
    AppError::NotFound {
        message: format!("Profile {id} not found"),
    }
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<ProfileId, Profile>>,
    password_hashes: Mutex<HashMap<ProfileId, String>>,
    fail_moderation_writes: AtomicBool,
    moderation_writes: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn insert(&self, profile: Profile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    pub fn insert_with_password(&self, profile: Profile, password_hash: &str) {
        self.password_hashes
            .lock()
            .unwrap()
            .insert(profile.id, password_hash.to_string());
        self.insert(profile);
    }

    pub fn get(&self, id: &ProfileId) -> Option<Profile> {
        self.profiles.lock().unwrap().get(id).cloned()
    }

    pub fn password_hash(&self, id: &ProfileId) -> Option<String> {
        self.password_hashes.lock().unwrap().get(id).cloned()
    }

    pub fn fail_moderation_writes(&self, fail: bool) {
        self.fail_moderation_writes.store(fail, Ordering::SeqCst);
    }

    pub fn moderation_write_count(&self) -> usize {
        self.moderation_writes.load(Ordering::SeqCst)
    }

    fn modify(&self, id: &ProfileId, change: impl FnOnce(&mut Profile)) -> AppResult<Profile> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(id).ok_or_else(|| missing_profile(id))?;
        change(profile);
        Ok(profile.clone())
    }
}

#[async_trait::async_trait]
impl ProfileStorePort for InMemoryProfileStore {
    async fn find_profile_by_id(&self, id: &ProfileId) -> AppResult<Option<Profile>> {
        Ok(self.get(id))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<ProfileCredentials>> {
        let profile_id = self
            .profiles
            .lock()
            .unwrap()
            .values()
            .find(|profile| profile.email.eq_ignore_ascii_case(email))
            .map(|profile| profile.id);

        Ok(profile_id.map(|profile_id| ProfileCredentials {
            profile_id,
            password_hash: self.password_hash(&profile_id),
        }))
    }

    async fn find_password_hash(&self, id: &ProfileId) -> AppResult<Option<String>> {
        Ok(self.password_hash(id))
    }

    async fn update_moderation(
        &self,
        id: &ProfileId,
        moderation: &ModerationState,
    ) -> AppResult<Profile> {
        self.moderation_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_moderation_writes.load(Ordering::SeqCst) {
            return Err(store_failure("update_moderation"));
        }
        self.modify(id, |profile| profile.moderation = moderation.clone())
    }

    async fn update_display_name(&self, id: &ProfileId, display_name: &str) -> AppResult<Profile> {
        self.modify(id, |profile| profile.display_name = display_name.to_string())
    }

    async fn update_password_hash(&self, id: &ProfileId, password_hash: &str) -> AppResult<()> {
        self.password_hashes
            .lock()
            .unwrap()
            .insert(*id, password_hash.to_string());
        Ok(())
    }

    async fn update_active_perk(&self, id: &ProfileId, perk: &str) -> AppResult<Profile> {
        self.modify(id, |profile| profile.active_perk = perk.to_string())
    }

    async fn update_avatar(&self, id: &ProfileId, avatar_url: &str) -> AppResult<Profile> {
        self.modify(id, |profile| profile.avatar_url = Some(avatar_url.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryBanEventStore {
    events: Mutex<Vec<BanEvent>>,
    fail_inserts: AtomicBool,
    fail_deactivation: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryBanEventStore {
    pub fn seed(&self, event: BanEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deactivation(&self, fail: bool) {
        self.fail_deactivation.store(fail, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Newest first; ties on `created_at` keep the later insert first.
    pub fn events_for(&self, user_id: &ProfileId) -> Vec<BanEvent> {
        let mut events: Vec<BanEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|event| event.user_id == *user_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events
    }

    pub fn active_events_for(&self, user_id: &ProfileId) -> Vec<BanEvent> {
        self.events_for(user_id)
            .into_iter()
            .filter(|event| event.is_active)
            .collect()
    }
}

#[async_trait::async_trait]
impl BanEventStorePort for InMemoryBanEventStore {
    async fn insert_ban_event(&self, event: &BanEvent) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(store_failure("insert_ban_event"));
        }
        self.seed(event.clone());
        Ok(())
    }

    async fn deactivate_active_ban_events(&self, user_id: &ProfileId) -> AppResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deactivation.load(Ordering::SeqCst) {
            return Err(store_failure("deactivate_active_ban_events"));
        }

        let mut changed = 0;
        for event in self.events.lock().unwrap().iter_mut() {
            if event.user_id == *user_id && event.is_active {
                event.is_active = false;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn find_latest_active_ban_event(
        &self,
        user_id: &ProfileId,
    ) -> AppResult<Option<BanEvent>> {
        Ok(self.active_events_for(user_id).into_iter().next())
    }

    async fn list_ban_events(&self, user_id: &ProfileId, limit: u32) -> AppResult<Vec<BanEvent>> {
        Ok(self
            .events_for(user_id)
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

/// Reversible stand-in for argon2 so tests stay fast.
pub struct PlainTextHasher;

impl PasswordHasherPort for PlainTextHasher {
    fn hash(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        Ok(password_hash.strip_prefix("plain$") == Some(password))
    }

    fn credential_stamp(&self, stored_hash: &str) -> Option<String> {
        stored_hash.strip_prefix("plain$").map(ToString::to_string)
    }
}
