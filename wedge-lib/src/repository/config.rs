use std::{fs, path::Path, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Result, dataset::Rules, fs::config_dir, repository::StorageKeys};

const FILE_NAME: &str = "core.toml";

/// Handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Name given to profiles created when none exist.
    pub default_profile_name: String,
    pub dataset: Rules,
    pub storage: StorageKeys,
}

impl CoreConfig {
    /// Load `core.toml` from the configuration directory, writing the defaults if it doesn't
    /// exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed {}: {err}", path.display());
                Self::default()
            }))
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn into_handle(self) -> Cfg {
        Arc::new(RwLock::new(self))
    }

    /// Configuration used by tests; never touches the filesystem.
    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::default()
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_profile_name: "Default User".into(),
            dataset: Rules::default(),
            storage: StorageKeys::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_creates_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(FILE_NAME);

        let cfg = CoreConfig::load_from(&path).unwrap();

        assert_eq!(cfg, CoreConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(
            &path,
            "[dataset]\nmax_rows = 7\n\n[storage]\nprofiles = \"pieChartUsers\"\n",
        )
        .unwrap();

        let cfg = CoreConfig::load_from(&path).unwrap();

        assert_eq!(cfg.dataset.max_rows, 7);
        assert_eq!(cfg.dataset.min_rows, 3);
        assert_eq!(cfg.storage.profiles, "pieChartUsers");
        assert_eq!(cfg.storage.current_profile, "currentUserId");
        assert_eq!(cfg.default_profile_name, "Default User");
    }

    #[test]
    fn test_malformed_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "dataset = 12 [[[").unwrap();

        assert_eq!(CoreConfig::load_from(&path).unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let mut cfg = CoreConfig::default();
        cfg.dataset.tiered_marker = "extra".into();
        cfg.save_to(&path).unwrap();

        assert_eq!(CoreConfig::load_from(&path).unwrap(), cfg);
    }
}
