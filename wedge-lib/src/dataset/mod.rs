//! Rows, datasets and the rules that keep them well formed.

use std::sync::LazyLock;

use getset::{CopyGetters, Getters};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod normalize;
pub mod palette;

pub use normalize::{clamp_value, ensure_minimum_rows, pin_domains};

/// Identifier of a row, unique within its dataset.
pub type RowId = u32;

/// An ordered sequence of rows owned by a single profile.
pub type Dataset = Vec<DatasetRow>;

/// A single labeled, colored and weighted slice of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct DatasetRow {
    #[getset(get_copy = "pub")]
    id: RowId,
    #[getset(get = "pub")]
    label: String,
    #[getset(get_copy = "pub")]
    value: f64,
    #[getset(get = "pub")]
    color: String,
    /// Numeric domain the value is clamped into. Rows written before domains existed carry
    /// none until they are pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getset(get_copy = "pub")]
    domain: Option<ValueDomain>,
}

impl DatasetRow {
    pub fn new(id: RowId, label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value,
            color: color.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: ValueDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// The domain used to clamp this row's value, falling back to what the label implies.
    pub fn effective_domain(&self, rules: &Rules) -> ValueDomain {
        self.domain
            .unwrap_or_else(|| rules.domain_for_label(&self.label))
    }

    /// Apply a single edit. Labels and colors are taken verbatim; values are clamped into the
    /// row's domain.
    ///
    /// A label edit that adds or drops the tiered marker re-pins the domain from the new label.
    /// Any other label edit keeps the pinned domain, including one set through
    /// [`RowEdit::Domain`].
    pub fn apply(&mut self, edit: RowEdit, rules: &Rules) {
        match edit {
            RowEdit::Label(label) => {
                let implied = rules.domain_for_label(&label);
                if implied != rules.domain_for_label(&self.label) {
                    self.pin(implied);
                }
                self.label = label;
            }
            RowEdit::Color(color) => self.color = color,
            RowEdit::Value(raw) => self.value = clamp_value(self, &raw, rules),
            RowEdit::Domain(domain) => self.pin(domain),
        }
    }

    /// Set the domain and bring the value into it.
    pub(crate) fn pin(&mut self, domain: ValueDomain) {
        self.domain = Some(domain);
        self.value = domain.clamp_number(self.value);
    }
}

/// An edit to one field of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    Label(String),
    Color(String),
    /// Raw user input; coerced and clamped when applied.
    Value(String),
    Domain(ValueDomain),
}

/// The set of values a row may hold.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueDomain {
    /// Whole numbers from 1 to 10.
    #[default]
    Standard,
    /// Exactly one of 10, 11, 12 or 13.
    Tiered,
}

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("pattern is valid")
});

/// Read the number `raw` starts with, ignoring whatever follows it. `12abc` reads as 12.
fn parse_leading(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<f64>() {
        return Some(n);
    }

    LEADING_NUMBER.find(raw)?.as_str().parse().ok()
}

const STANDARD_RANGE: (f64, f64) = (1.0, 10.0);
const TIERS: [f64; 4] = [10.0, 11.0, 12.0, 13.0];
const TIER_MIN: f64 = 10.0;

impl ValueDomain {
    pub fn minimum(self) -> f64 {
        match self {
            ValueDomain::Standard => STANDARD_RANGE.0,
            ValueDomain::Tiered => TIER_MIN,
        }
    }

    /// Parse raw input and clamp it into this domain. Only a leading number counts; input that
    /// doesn't start with one becomes the domain minimum.
    pub fn clamp_str(self, raw: &str) -> f64 {
        match parse_leading(raw) {
            Some(n) => self.clamp_number(n),
            None => self.minimum(),
        }
    }

    pub fn clamp_number(self, n: f64) -> f64 {
        if n.is_nan() {
            return self.minimum();
        }

        let rounded = n.round();
        match self {
            ValueDomain::Standard => rounded.clamp(STANDARD_RANGE.0, STANDARD_RANGE.1),
            ValueDomain::Tiered if TIERS.contains(&rounded) => rounded,
            ValueDomain::Tiered => self.minimum(),
        }
    }

    pub fn contains(self, n: f64) -> bool {
        match self {
            ValueDomain::Standard => {
                n.fract() == 0.0 && (STANDARD_RANGE.0..=STANDARD_RANGE.1).contains(&n)
            }
            ValueDomain::Tiered => TIERS.contains(&n),
        }
    }
}

/// Bounds and defaults applied to every dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub min_rows: usize,
    pub max_rows: usize,
    /// Number of rows in a freshly seeded dataset.
    pub seed_rows: usize,
    /// Value of each row in a freshly seeded dataset.
    pub seed_value: f64,
    /// Value of rows synthesized to reach `min_rows`.
    pub fill_value: f64,
    /// Value of rows added by the user.
    pub add_value: f64,
    /// Labels containing this text (case-insensitive) get the tiered domain.
    pub tiered_marker: String,
}

impl Rules {
    pub fn domain_for_label(&self, label: &str) -> ValueDomain {
        if !self.tiered_marker.is_empty()
            && label
                .to_lowercase()
                .contains(&self.tiered_marker.to_lowercase())
        {
            ValueDomain::Tiered
        } else {
            ValueDomain::Standard
        }
    }

    /// The smallest number of rows a dataset may shrink to. At least one row always remains.
    pub fn row_floor(&self) -> usize {
        self.min_rows.max(1)
    }

    /// A freshly seeded dataset: `Category 1..n` on the first palette colors.
    pub fn seed_dataset(&self) -> Dataset {
        ensure_minimum_rows(Vec::new(), self.seed_rows, self)
            .into_iter()
            .map(|mut row| {
                row.value = self.seed_value;
                row
            })
            .collect()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_rows: 3,
            max_rows: 10,
            seed_rows: 5,
            seed_value: 5.0,
            fill_value: 10.0,
            add_value: 5.0,
            tiered_marker: "bonus".into(),
        }
    }
}
