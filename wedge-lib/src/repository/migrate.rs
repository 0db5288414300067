//! Import of the older single-dataset layout.
//!
//! Before profiles existed a single dataset was stored as a JSON array under its own key, next
//! to a bare chart title. When no profiles exist yet, that dataset becomes the first profile and
//! the old keys are removed.

use tracing::{error, info, warn};

use crate::{
    Result,
    dataset::Dataset,
    repository::{KeyValueStore, Profile, ProfileStore},
};

/// Turn a legacy dataset into a profile, if there is one and no profiles exist yet.
///
/// Returns the imported profile. Legacy data that can't be decoded is left where it is.
pub fn import_legacy<S: KeyValueStore>(
    store: &ProfileStore<S>,
    default_name: &str,
) -> Option<Profile> {
    if !store.list_profiles().is_empty() {
        return None;
    }

    let (dataset, title) = match read_legacy(store) {
        Ok(Some(legacy)) => legacy,
        Ok(None) => return None,
        Err(err) => {
            error!("Failed to read legacy dataset, leaving it in place: {err}");
            return None;
        }
    };

    let name = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| default_name.to_string());
    let profile = Profile::new(name, dataset);

    store.save_profiles(std::slice::from_ref(&profile));
    store.set_current_profile_id(profile.id());

    let keys = store.keys();
    for key in [&keys.legacy_dataset, &keys.legacy_title] {
        if let Err(err) = store.kv().remove(key) {
            warn!("Failed to remove legacy key {key}: {err}");
        }
    }

    info!("Imported legacy dataset as profile {}", profile.name());

    Some(profile)
}

fn read_legacy<S: KeyValueStore>(
    store: &ProfileStore<S>,
) -> Result<Option<(Dataset, Option<String>)>> {
    let keys = store.keys();

    let Some(json) = store.kv().get(&keys.legacy_dataset)? else {
        return Ok(None);
    };
    let dataset: Dataset = serde_json::from_str(&json)?;
    let title = store.kv().get(&keys.legacy_title)?;

    Ok(Some((dataset, title)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::store::test::mock_store;

    const LEGACY: &str = r##"[{"id":1,"label":"Category A","value":30,"color":"#4E79A7"},{"id":2,"label":"Category B","value":25,"color":"#F28E2B"}]"##;

    #[test]
    fn test_import() {
        let store = mock_store();
        store.kv().set("pieChartData", LEGACY).unwrap();
        store.kv().set("chartTitle", "Monthly budget").unwrap();

        let profile = import_legacy(&store, "Default User").unwrap();

        assert_eq!(profile.name(), "Monthly budget");
        assert_eq!(profile.chart_data().len(), 2);
        assert_eq!(profile.chart_data()[0].value(), 30.0);

        let state = store.get_state();
        assert_eq!(state.profiles, vec![profile.clone()]);
        assert_eq!(state.current_profile_id.as_ref(), Some(profile.id()));
        assert_eq!(store.kv().get("pieChartData").unwrap(), None);
        assert_eq!(store.kv().get("chartTitle").unwrap(), None);
    }

    #[test]
    fn test_import_without_title() {
        let store = mock_store();
        store.kv().set("pieChartData", LEGACY).unwrap();

        let profile = import_legacy(&store, "Default User").unwrap();

        assert_eq!(profile.name(), "Default User");
    }

    #[test]
    fn test_nothing_to_import() {
        let store = mock_store();

        assert!(import_legacy(&store, "Default User").is_none());
        assert!(store.list_profiles().is_empty());
    }

    #[test]
    fn test_skipped_when_profiles_exist() {
        let store = mock_store();
        store.add_profile("Alice");
        store.kv().set("pieChartData", LEGACY).unwrap();

        assert!(import_legacy(&store, "Default User").is_none());
        assert_eq!(store.list_profiles().len(), 1);
        assert!(store.kv().get("pieChartData").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_legacy_left_in_place() {
        let store = mock_store();
        store.kv().set("pieChartData", "[{oops").unwrap();

        assert!(import_legacy(&store, "Default User").is_none());
        assert_eq!(
            store.kv().get("pieChartData").unwrap().as_deref(),
            Some("[{oops")
        );
    }
}
