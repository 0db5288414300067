use derive_more::{Display, From};
use getset::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::Dataset;

/// Opaque, globally unique identifier of a [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// A freshly generated v4 UUID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProfileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A named owner of exactly one dataset.
///
/// The serialized form is the persisted contract: `{ "id", "name", "chartData" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Profile {
    id: ProfileId,
    name: String,
    #[serde(rename = "chartData")]
    chart_data: Dataset,
}

impl Profile {
    pub fn new(name: impl Into<String>, chart_data: Dataset) -> Self {
        Self {
            id: ProfileId::generate(),
            name: name.into(),
            chart_data,
        }
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_chart_data(&mut self, chart_data: Dataset) {
        self.chart_data = chart_data;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dataset::DatasetRow;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ProfileId::generate();
        let b = ProfileId::generate();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_json_layout() {
        let profile = Profile {
            id: "abc".into(),
            name: "Sample User".into(),
            chart_data: vec![DatasetRow::new(1, "Category 1", 5.0, "#4E79A7")],
        };

        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "name": "Sample User",
                "chartData": [
                    {"id": 1, "label": "Category 1", "value": 5.0, "color": "#4E79A7"}
                ]
            })
        );
    }

    #[test]
    fn test_reads_integer_values() {
        let json = r##"{"id":"x","name":"n","chartData":[{"id":1,"label":"a","value":5,"color":"#000"}]}"##;

        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.chart_data()[0].value(), 5.0);
        assert_eq!(profile.chart_data()[0].domain(), None);
    }
}
