//! Fixed color palette used when the system picks a row color.

use rand::Rng;

use crate::dataset::DatasetRow;

pub const PALETTE: [&str; 10] = [
    "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
    "#9C755F", "#BAB0AC",
];

/// The palette color at `position`, wrapping around.
pub fn slot(position: usize) -> &'static str {
    PALETTE
        .get(position % PALETTE.len())
        .copied()
        .unwrap_or("#4E79A7")
}

/// First palette color not already used by a row. Comparison ignores case since color pickers
/// tend to hand back lowercase hex.
pub fn first_unused(rows: &[DatasetRow]) -> Option<&'static str> {
    PALETTE
        .iter()
        .copied()
        .find(|c| !rows.iter().any(|r| r.color().eq_ignore_ascii_case(c)))
}

/// A random `#rrggbb` color.
pub fn random() -> String {
    let rgb: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
    format!("#{rgb:06x}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_unused_ignores_case() {
        let rows = vec![
            DatasetRow::new(1, "a", 1.0, "#4e79a7"),
            DatasetRow::new(2, "b", 1.0, "#F28E2B"),
        ];

        assert_eq!(first_unused(&rows), Some("#E15759"));
    }

    #[test]
    fn test_first_unused_exhausted() {
        let rows: Vec<_> = PALETTE
            .iter()
            .zip(1..)
            .map(|(c, id)| DatasetRow::new(id, "x", 1.0, *c))
            .collect();

        assert_eq!(first_unused(&rows), None);
    }

    #[test]
    fn test_slot_wraps() {
        assert_eq!(slot(0), "#4E79A7");
        assert_eq!(slot(10), "#4E79A7");
        assert_eq!(slot(12), "#E15759");
    }

    #[test]
    fn test_random_format() {
        for _ in 0..32 {
            let c = random();
            assert_eq!(c.len(), 7);
            assert!(c.starts_with('#'));
            assert!(c[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
        }
    }
}
