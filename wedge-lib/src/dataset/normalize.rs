//! Normalization that never fails: invalid input degrades to safe defaults.

use std::collections::HashSet;

use crate::dataset::{Dataset, DatasetRow, RowId, Rules, palette};

/// Pad `dataset` with synthesized rows until it holds at least `target` rows.
///
/// Existing rows are left untouched. New rows take the smallest unused positive id, the first
/// palette color nobody uses yet (or the palette slot at their position once the palette runs
/// out), a `Category {id}` label and the configured fill value.
pub fn ensure_minimum_rows(mut dataset: Dataset, target: usize, rules: &Rules) -> Dataset {
    if dataset.len() >= target {
        return dataset;
    }

    let mut used_ids: HashSet<RowId> = dataset.iter().map(DatasetRow::id).collect();
    let mut next_id: RowId = 1;

    while dataset.len() < target {
        while used_ids.contains(&next_id) {
            next_id += 1;
        }
        used_ids.insert(next_id);

        let color = palette::first_unused(&dataset)
            .unwrap_or_else(|| palette::slot(dataset.len()))
            .to_string();
        let label = format!("Category {next_id}");
        let domain = rules.domain_for_label(&label);

        dataset.push(DatasetRow::new(next_id, label, rules.fill_value, color).with_domain(domain));
    }

    dataset
}

/// Coerce raw input into a value for `row`, using its pinned domain or the one its label implies.
pub fn clamp_value(row: &DatasetRow, raw: &str, rules: &Rules) -> f64 {
    row.effective_domain(rules).clamp_str(raw)
}

/// Pin a domain on every row that doesn't have one yet, and clamp every value into its row's
/// domain.
pub fn pin_domains(dataset: Dataset, rules: &Rules) -> Dataset {
    dataset
        .into_iter()
        .map(|mut row| {
            let domain = row.effective_domain(rules);
            row.pin(domain);
            row
        })
        .collect()
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::dataset::{ValueDomain, palette::PALETTE};

    #[test]
    fn test_fills_to_target() {
        let rules = Rules::default();
        let data = vec![DatasetRow::new(1, "A", 5.0, "#fff")];

        let filled = ensure_minimum_rows(data.clone(), 3, &rules);

        assert_eq!(filled.len(), 3);
        assert_eq!(filled[0], data[0]);
        let mut ids: Vec<_> = filled.iter().map(|r| r.id()).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(filled[1].label(), "Category 2");
        assert_eq!(filled[1].value(), 10.0);
        assert_eq!(filled[1].color(), PALETTE[0]);
        assert_eq!(filled[2].color(), PALETTE[1]);
    }

    #[test]
    fn test_fills_id_gaps_first() {
        let rules = Rules::default();
        let data = vec![
            DatasetRow::new(2, "B", 5.0, PALETTE[0]),
            DatasetRow::new(5, "E", 5.0, PALETTE[2]),
        ];

        let filled = ensure_minimum_rows(data, 5, &rules);

        let ids: Vec<_> = filled.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![2, 5, 1, 3, 4]);
        assert_eq!(filled[2].color(), PALETTE[1]);
        assert_eq!(filled[3].color(), PALETTE[3]);
    }

    #[test]
    fn test_long_enough_is_unchanged() {
        let rules = Rules::default();
        let data = rules.seed_dataset();

        assert_eq!(ensure_minimum_rows(data.clone(), 3, &rules), data);
    }

    #[test]
    fn test_palette_exhausted_uses_position() {
        let rules = Rules::default();
        let data: Vec<_> = PALETTE
            .iter()
            .zip(1..)
            .map(|(c, id)| DatasetRow::new(id, "x", 1.0, *c))
            .collect();

        let filled = ensure_minimum_rows(data, 12, &rules);

        assert_eq!(filled[10].color(), PALETTE[0]);
        assert_eq!(filled[11].color(), PALETTE[1]);
    }

    #[test]
    fn test_clamp_uses_label_for_unpinned_rows() {
        let rules = Rules::default();
        let bonus = DatasetRow::new(1, "Weekend bonus", 10.0, "#000");
        let plain = DatasetRow::new(2, "Groceries", 5.0, "#000");

        assert_eq!(clamp_value(&bonus, "12", &rules), 12.0);
        assert_eq!(clamp_value(&bonus, "3", &rules), 10.0);
        assert_eq!(clamp_value(&plain, "12", &rules), 10.0);
        assert_eq!(clamp_value(&plain, "x", &rules), 1.0);
    }

    #[test]
    fn test_clamp_prefers_explicit_domain() {
        let rules = Rules::default();
        let row = DatasetRow::new(1, "Groceries", 5.0, "#000").with_domain(ValueDomain::Tiered);

        assert_eq!(clamp_value(&row, "12", &rules), 12.0);
        assert_eq!(clamp_value(&row, "7", &rules), 10.0);
    }

    #[test]
    fn test_pin_domains() {
        let rules = Rules::default();
        let data = vec![
            DatasetRow::new(1, "BONUS", 10.0, "#000"),
            DatasetRow::new(2, "rent", 5.0, "#000"),
            DatasetRow::new(3, "bonus", 5.0, "#000").with_domain(ValueDomain::Standard),
        ];

        let pinned = pin_domains(data, &rules);

        assert_eq!(pinned[0].domain(), Some(ValueDomain::Tiered));
        assert_eq!(pinned[1].domain(), Some(ValueDomain::Standard));
        assert_eq!(pinned[2].domain(), Some(ValueDomain::Standard));
        assert!(pinned.iter().map(DatasetRow::value).eq([10.0, 5.0, 5.0]));
    }

    #[test]
    fn test_pin_domains_clamps_values() {
        let rules = Rules::default();
        let data = vec![
            DatasetRow::new(1, "Category A", 30.0, "#000"),
            DatasetRow::new(2, "Bonus", 4.0, "#000"),
            DatasetRow::new(3, "rent", 2.4, "#000").with_domain(ValueDomain::Standard),
        ];

        let pinned = pin_domains(data, &rules);

        assert!(pinned.iter().map(DatasetRow::value).eq([10.0, 10.0, 2.0]));
        assert!(
            pinned
                .iter()
                .all(|r| r.effective_domain(&rules).contains(r.value()))
        );
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        prop::collection::hash_set(1u32..40, 0..12).prop_map(|ids| {
            ids.into_iter()
                .map(|id| DatasetRow::new(id, format!("Row {id}"), 1.0, "#123456"))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn test_ensure_minimum_rows_properties(data in arb_dataset(), target in 0usize..15) {
            let rules = Rules::default();
            let filled = ensure_minimum_rows(data.clone(), target, &rules);

            prop_assert_eq!(filled.len(), data.len().max(target));
            prop_assert_eq!(&filled[..data.len()], &data[..]);

            let ids: HashSet<_> = filled.iter().map(|r| r.id()).collect();
            prop_assert_eq!(ids.len(), filled.len());
            prop_assert!(ids.iter().all(|id| *id >= 1));
        }

        #[test]
        fn test_clamp_value_in_domain(label in "[a-zA-Z ]{0,16}", raw in ".{0,12}", bonus in any::<bool>()) {
            let rules = Rules::default();
            let label = if bonus { format!("{label} Bonus") } else { label.replace(['b', 'B'], "") };
            let row = DatasetRow::new(1, label, 1.0, "#000");

            let value = clamp_value(&row, &raw, &rules);

            prop_assert!(value >= 0.0);
            if bonus {
                prop_assert!([10.0, 11.0, 12.0, 13.0].contains(&value));
            } else {
                prop_assert!(ValueDomain::Standard.contains(value));
            }
        }

        #[test]
        fn test_clamp_number_never_negative(n in any::<f64>()) {
            prop_assert!(ValueDomain::Standard.clamp_number(n) >= 1.0);
            prop_assert!(ValueDomain::Tiered.clamp_number(n) >= 10.0);
        }
    }
}
