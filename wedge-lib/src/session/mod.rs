//! The editing session a front end drives.
//!
//! A [`Session`] owns the in-memory copy of every profile plus the active dataset. Each edit is
//! validated, applied, and persisted through the [`ProfileStore`] before the call returns.
//! Edits that break a row-count bound are declined with a [`Notice`] instead of an error.

use derive_more::Display;
use tracing::{debug, info, warn};

use crate::{
    chart::{self, Slice},
    dataset::{Dataset, DatasetRow, RowEdit, RowId, Rules, ensure_minimum_rows, pin_domains},
    repository::{Cfg, KeyValueStore, Profile, ProfileId, ProfileStore, migrate},
};

pub mod rows;

/// Where a [`Session`] is in its startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
}

/// A user-visible explanation of why an edit was declined.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Notice {
    #[display("A chart can have at most {max} rows")]
    TooManyRows { max: usize },
    #[display("A chart needs at least {min} rows")]
    TooFewRows { min: usize },
    #[display("No profile with id {_0}")]
    UnknownProfile(ProfileId),
}

/// Asks the user a yes/no question before something destructive happens.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a confirmed-or-not destructive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The user said no; nothing changed.
    Cancelled,
    /// Done. `current` is the profile selected afterwards.
    Done { current: ProfileId },
}

pub struct Session<S> {
    store: ProfileStore<S>,
    cfg: Cfg,
    phase: Phase,
    profiles: Vec<Profile>,
    current: Option<ProfileId>,
    dataset: Dataset,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(kv: S, cfg: Cfg) -> Self {
        let store = {
            let cfg = cfg.read();
            ProfileStore::new(kv, cfg.storage.clone(), cfg.dataset.clone())
        };

        Self {
            store,
            cfg,
            phase: Phase::Uninitialized,
            profiles: Vec::new(),
            current: None,
            dataset: Vec::new(),
        }
    }

    /// Create a session and load it straight away.
    pub fn open(kv: S, cfg: Cfg) -> Self {
        let mut session = Self::new(kv, cfg);
        session.load();
        session
    }

    /// Read the persisted state, importing legacy data and seeding a default profile as needed.
    /// Does nothing once the session is ready.
    pub fn load(&mut self) {
        if self.phase != Phase::Uninitialized {
            return;
        }
        self.phase = Phase::Loading;

        let default_name = self.cfg.read().default_profile_name.clone();
        migrate::import_legacy(&self.store, &default_name);

        let state = self.store.get_state();
        self.profiles = state.profiles;

        match state.current_profile_id {
            Some(id) => self.activate(&id),
            None => {
                self.seed_default();
            }
        }

        self.phase = Phase::Ready;
        debug!(
            "Session ready with {} profile(s), current {:?}",
            self.profiles.len(),
            self.current
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn current_profile_id(&self) -> Option<&ProfileId> {
        self.current.as_ref()
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        let id = self.current.as_ref()?;
        self.profiles.iter().find(|p| p.id() == id)
    }

    /// The active dataset, in storage order.
    pub fn dataset(&self) -> &[DatasetRow] {
        &self.dataset
    }

    /// The active dataset as chart slices, largest first.
    pub fn slices(&self) -> Vec<Slice> {
        chart::slices(&self.dataset)
    }

    pub fn rules(&self) -> Rules {
        self.cfg.read().dataset.clone()
    }

    // Rows

    /// Append a row to the active dataset, returning its id.
    pub fn add_row(&mut self) -> Result<RowId, Notice> {
        self.load();

        let dataset = rows::add_row(&self.dataset, &self.rules()).inspect_err(|n| warn!("{n}"))?;
        let id = dataset.last().map(DatasetRow::id).unwrap_or_default();
        self.commit(dataset);

        debug!("Added row {id}");

        Ok(id)
    }

    pub fn remove_row(&mut self, id: RowId) -> Result<(), Notice> {
        self.load();

        let dataset =
            rows::remove_row(&self.dataset, id, &self.rules()).inspect_err(|n| warn!("{n}"))?;
        self.commit(dataset);

        debug!("Removed row {id}");

        Ok(())
    }

    pub fn update_row(&mut self, id: RowId, edit: RowEdit) {
        self.load();

        debug!("Updating row {id}: {edit:?}");

        let dataset = rows::update_row(&self.dataset, id, edit, &self.rules());
        self.commit(dataset);
    }

    // Profiles

    /// Create a profile with the seed dataset and select it.
    pub fn add_profile(&mut self, name: &str) -> ProfileId {
        self.load();

        let profile = self.store.add_profile(name);
        let id = profile.id().clone();
        self.profiles.push(profile);
        self.activate(&id);

        info!("Added profile {name}");

        id
    }

    pub fn select_profile(&mut self, id: &ProfileId) -> Result<(), Notice> {
        self.load();

        self.require(id)?;
        self.activate(id);

        Ok(())
    }

    pub fn rename_profile(&mut self, id: &ProfileId, name: &str) -> Result<(), Notice> {
        self.load();

        self.require(id)?;
        self.store.rename_profile(id, name);
        if let Some(profile) = self.profiles.iter_mut().find(|p| p.id() == id) {
            profile.set_name(name);
        }

        Ok(())
    }

    /// Remove a profile after confirmation. If it was selected, the first remaining profile
    /// takes over, or a fresh default profile when none remain.
    pub fn remove_profile(
        &mut self,
        id: &ProfileId,
        confirm: &mut impl Confirm,
    ) -> Result<Removal, Notice> {
        self.load();

        let name = self.require(id)?.name().clone();
        if !confirm.confirm(&format!("Remove profile \"{name}\"?")) {
            debug!("Removal of {name} cancelled");
            return Ok(Removal::Cancelled);
        }

        self.store.remove_profile(id);
        self.profiles.retain(|p| p.id() != id);

        let current = match self.current.clone() {
            Some(current) if &current != id => current,
            _ => match self.profiles.first().map(|p| p.id().clone()) {
                Some(next) => {
                    self.activate(&next);
                    next
                }
                None => self.seed_default(),
            },
        };

        info!("Removed profile {name}");

        Ok(Removal::Done { current })
    }

    /// Wipe everything after confirmation and start over with a default profile.
    pub fn reset(&mut self, confirm: &mut impl Confirm) -> Removal {
        self.load();

        if !confirm.confirm("Remove every profile and start over?") {
            return Removal::Cancelled;
        }

        self.store.clear();
        self.profiles.clear();
        self.current = None;
        let current = self.seed_default();

        info!("Reset all profiles");

        Removal::Done { current }
    }

    fn require(&self, id: &ProfileId) -> Result<&Profile, Notice> {
        self.profiles
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| {
                let notice = Notice::UnknownProfile(id.clone());
                warn!("{notice}");
                notice
            })
    }

    /// Make `id` current. Its dataset is padded to the minimum row count and has its domains
    /// pinned; if that changed anything it is written back.
    fn activate(&mut self, id: &ProfileId) {
        let rules = self.rules();
        let Some(profile) = self.profiles.iter_mut().find(|p| p.id() == id) else {
            return;
        };

        let dataset = pin_domains(
            ensure_minimum_rows(profile.chart_data().clone(), rules.min_rows, &rules),
            &rules,
        );
        if &dataset != profile.chart_data() {
            profile.set_chart_data(dataset.clone());
            self.store.update_profile_dataset(id, dataset.clone());
        }

        self.store.set_current_profile_id(id);
        self.current = Some(id.clone());
        self.dataset = dataset;
    }

    fn seed_default(&mut self) -> ProfileId {
        let name = self.cfg.read().default_profile_name.clone();
        let profile = self.store.add_profile(&name);
        let id = profile.id().clone();

        self.profiles.push(profile);
        self.activate(&id);

        info!("Created default profile {name}");

        id
    }

    fn commit(&mut self, dataset: Dataset) {
        let Some(id) = self.current.clone() else {
            return;
        };

        self.store.update_profile_dataset(&id, dataset.clone());
        if let Some(profile) = self.profiles.iter_mut().find(|p| p.id() == &id) {
            profile.set_chart_data(dataset.clone());
        }
        self.dataset = dataset;
    }
}
