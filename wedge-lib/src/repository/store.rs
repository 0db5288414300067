use tracing::{debug, error};

use crate::{
    Result,
    dataset::{Dataset, Rules},
    repository::{KeyValueStore, Profile, ProfileId, StorageKeys},
};

/// Snapshot of everything persisted: the profiles plus a pointer to the current one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub profiles: Vec<Profile>,
    /// Always refers to a member of `profiles` when set.
    pub current_profile_id: Option<ProfileId>,
}

/// Maps profile ids to profiles on top of a [`KeyValueStore`].
///
/// Storage failures never reach the caller. Reads that fail degrade to an empty collection and
/// writes that fail are dropped; both are logged.
#[derive(Debug, Clone)]
pub struct ProfileStore<S> {
    kv: S,
    keys: StorageKeys,
    rules: Rules,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(kv: S, keys: StorageKeys, rules: Rules) -> Self {
        Self { kv, keys, rules }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub(crate) fn kv(&self) -> &S {
        &self.kv
    }

    pub fn list_profiles(&self) -> Vec<Profile> {
        self.try_list_profiles().unwrap_or_else(|err| {
            error!("Failed to read profiles: {err}");
            Vec::new()
        })
    }

    /// Create a profile with a fresh id and the seed dataset, and append it to the collection.
    pub fn add_profile(&self, name: &str) -> Profile {
        let profile = Profile::new(name, self.rules.seed_dataset());

        let mut profiles = self.list_profiles();
        profiles.push(profile.clone());
        self.save_profiles(&profiles);

        debug!("Added profile {name} ({})", profile.id());

        profile
    }

    /// Replace the dataset of the profile with the given id. Unknown ids are ignored.
    pub fn update_profile_dataset(&self, id: &ProfileId, dataset: Dataset) {
        self.modify(id, |p| p.set_chart_data(dataset));
    }

    /// Rename the profile with the given id. Unknown ids are ignored.
    pub fn rename_profile(&self, id: &ProfileId, name: &str) {
        self.modify(id, |p| p.set_name(name));
    }

    /// Drop the profile with the given id. The current pointer is left alone; [`Self::get_state`]
    /// repairs it on the next read.
    pub fn remove_profile(&self, id: &ProfileId) {
        let mut profiles = self.list_profiles();
        let before = profiles.len();
        profiles.retain(|p| p.id() != id);

        if profiles.len() != before {
            self.save_profiles(&profiles);
            debug!("Removed profile {id}");
        }
    }

    /// Persist the current pointer. No check is made that the profile exists.
    pub fn set_current_profile_id(&self, id: &ProfileId) {
        if let Err(err) = self.kv.set(&self.keys.current_profile, id.as_str()) {
            error!("Failed to save current profile: {err}");
        }
    }

    pub fn clear_current_profile_id(&self) {
        if let Err(err) = self.kv.remove(&self.keys.current_profile) {
            error!("Failed to clear current profile: {err}");
        }
    }

    /// The persisted state, with the current pointer validated against the collection. An
    /// invalid or missing pointer falls back to the first profile.
    pub fn get_state(&self) -> State {
        let profiles = self.list_profiles();

        let stored = self
            .kv
            .get(&self.keys.current_profile)
            .unwrap_or_else(|err| {
                error!("Failed to read current profile: {err}");
                None
            })
            .map(ProfileId::from);

        let current_profile_id = stored
            .filter(|id| profiles.iter().any(|p| p.id() == id))
            .or_else(|| profiles.first().map(|p| p.id().clone()));

        State {
            profiles,
            current_profile_id,
        }
    }

    /// Remove every key in the namespace, including legacy ones.
    pub fn clear(&self) {
        for key in self.keys.all() {
            if let Err(err) = self.kv.remove(key) {
                error!("Failed to remove {key}: {err}");
            }
        }
    }

    pub(crate) fn save_profiles(&self, profiles: &[Profile]) {
        if let Err(err) = self.try_save_profiles(profiles) {
            error!("Failed to save profiles: {err}");
        }
    }

    fn modify(&self, id: &ProfileId, f: impl FnOnce(&mut Profile)) {
        let mut profiles = self.list_profiles();

        if let Some(profile) = profiles.iter_mut().find(|p| p.id() == id) {
            f(profile);
            self.save_profiles(&profiles);
        } else {
            debug!("Ignoring update to unknown profile {id}");
        }
    }

    fn try_list_profiles(&self) -> Result<Vec<Profile>> {
        match self.kv.get(&self.keys.profiles)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn try_save_profiles(&self, profiles: &[Profile]) -> Result<()> {
        let json = serde_json::to_string(profiles)?;
        self.kv.set(&self.keys.profiles, &json)
    }
}
