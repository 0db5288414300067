//! Percentages and labels for drawing a dataset as a pie or doughnut chart.

use crate::dataset::DatasetRow;

/// One wedge of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: String,
    /// Share of the total, 0 to 100.
    pub percentage: f64,
}

impl Slice {
    /// `"{label} ({pct}%)"`, as shown in the legend.
    pub fn legend(&self) -> String {
        format!("{} ({:.1}%)", self.label, self.percentage)
    }

    /// `"{label}: {value} ({pct}%)"`, as shown when hovering a wedge.
    pub fn tooltip(&self) -> String {
        format!("{}: {} ({:.1}%)", self.label, self.value, self.percentage)
    }
}

/// Slices for `rows`, largest first. A dataset whose values sum to zero gets 0% everywhere.
pub fn slices(rows: &[DatasetRow]) -> Vec<Slice> {
    let total: f64 = rows.iter().map(DatasetRow::value).sum();

    let mut slices: Vec<Slice> = rows
        .iter()
        .map(|r| Slice {
            label: r.label().clone(),
            value: r.value(),
            color: r.color().clone(),
            percentage: if total > 0.0 {
                r.value() / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    // Stable, so equal values keep dataset order
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));

    slices
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sorted_descending() {
        let rows = vec![
            DatasetRow::new(1, "Small", 1.0, "#111111"),
            DatasetRow::new(2, "Big", 3.0, "#222222"),
            DatasetRow::new(3, "Also small", 1.0, "#333333"),
        ];

        let labels: Vec<_> = slices(&rows).into_iter().map(|s| s.label).collect();

        assert_eq!(labels, vec!["Big", "Small", "Also small"]);
    }

    #[test]
    fn test_percentages() {
        let rows = vec![
            DatasetRow::new(1, "A", 1.0, "#111111"),
            DatasetRow::new(2, "B", 2.0, "#222222"),
        ];

        let s = slices(&rows);

        assert_eq!(s[0].legend(), "B (66.7%)");
        assert_eq!(s[1].legend(), "A (33.3%)");
        assert_eq!(s[0].tooltip(), "B: 2 (66.7%)");
        assert!((s.iter().map(|s| s.percentage).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total() {
        let rows = vec![DatasetRow::new(1, "A", 0.0, "#111111")];

        assert_eq!(slices(&rows)[0].legend(), "A (0.0%)");
    }

    #[test]
    fn test_empty() {
        assert!(slices(&[]).is_empty());
    }
}
