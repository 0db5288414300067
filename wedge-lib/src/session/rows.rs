//! Row operations on a dataset. Each returns the new dataset and leaves the input alone.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    dataset::{Dataset, DatasetRow, RowEdit, RowId, Rules, palette},
    session::Notice,
};

static CATEGORY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Category (\d+)$").expect("pattern is valid"));

/// Append a new row, unless the dataset is already at `max_rows`.
///
/// The row gets `max(id) + 1`, the first unused palette color (a random one once the palette is
/// used up) and a `Category {n}` label numbered after the highest existing one.
pub fn add_row(rows: &[DatasetRow], rules: &Rules) -> Result<Dataset, Notice> {
    if rows.len() >= rules.max_rows {
        return Err(Notice::TooManyRows {
            max: rules.max_rows,
        });
    }

    let id = rows
        .iter()
        .map(DatasetRow::id)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    let color = palette::first_unused(rows)
        .map(str::to_string)
        .unwrap_or_else(palette::random);

    let label = format!("Category {}", highest_category(rows).saturating_add(1));
    let domain = rules.domain_for_label(&label);

    let mut dataset = rows.to_vec();
    dataset.push(DatasetRow::new(id, label, rules.add_value, color).with_domain(domain));

    Ok(dataset)
}

/// Remove the row with `id`, unless that would leave fewer than [`Rules::row_floor`] rows.
/// Removing an id that isn't present changes nothing.
pub fn remove_row(rows: &[DatasetRow], id: RowId, rules: &Rules) -> Result<Dataset, Notice> {
    if !rows.iter().any(|r| r.id() == id) {
        return Ok(rows.to_vec());
    }

    let floor = rules.row_floor();
    if rows.len() <= floor {
        return Err(Notice::TooFewRows { min: floor });
    }

    Ok(rows.iter().filter(|r| r.id() != id).cloned().collect())
}

/// Apply `edit` to the row with `id`. Unknown ids are ignored.
pub fn update_row(rows: &[DatasetRow], id: RowId, edit: RowEdit, rules: &Rules) -> Dataset {
    let mut dataset = rows.to_vec();

    if let Some(row) = dataset.iter_mut().find(|r| r.id() == id) {
        row.apply(edit, rules);
    }

    dataset
}

fn highest_category(rows: &[DatasetRow]) -> u32 {
    rows.iter()
        .filter_map(|r| CATEGORY_LABEL.captures(r.label()))
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}
