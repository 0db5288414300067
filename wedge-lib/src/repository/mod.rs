//! Persistence of profiles and the current profile pointer.
//!
//! Everything is stored as JSON strings in a [`KeyValueStore`] under the keys named by
//! [`StorageKeys`]. [`Db`] is the agdb-backed implementation used by the application; tests can
//! inject their own.

use serde::{Deserialize, Serialize};

use crate::Result;

mod db;
mod profile;
mod store;

pub mod config;
pub mod migrate;

pub use config::{Cfg, CoreConfig};
pub use db::Db;
pub use profile::{Profile, ProfileId};
pub use store::{ProfileStore, State};

#[cfg(test)]
pub(crate) use store::test::{BrokenStore, mock_store};

/// A string-to-string store. Writes are visible to subsequent reads on the same handle.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a key that doesn't exist is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// The keys everything is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// JSON array of profiles.
    pub profiles: String,
    /// Bare id of the current profile.
    pub current_profile: String,
    /// JSON array of rows written by the single-dataset layout.
    pub legacy_dataset: String,
    /// Bare chart title written by the single-dataset layout.
    pub legacy_title: String,
}

impl StorageKeys {
    pub fn all(&self) -> [&str; 4] {
        [
            &self.profiles,
            &self.current_profile,
            &self.legacy_dataset,
            &self.legacy_title,
        ]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            profiles: "lifeChartUsers".into(),
            current_profile: "currentUserId".into(),
            legacy_dataset: "pieChartData".into(),
            legacy_title: "chartTitle".into(),
        }
    }
}
