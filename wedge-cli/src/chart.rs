use std::ops::Range;

use colored::{ColoredString, Colorize};
use wedge_lib::{KeyValueStore, Session};

const BAR_WIDTH: u32 = 40;

/// Print the current profile's chart as horizontal bars, largest slice first.
pub fn print<S: KeyValueStore>(session: &Session<S>) {
    if let Some(profile) = session.current_profile() {
        println!("{}", profile.name().bold());
    }

    for slice in session.slices() {
        let scaled = slice.percentage * f64::from(BAR_WIDTH) / 100.0;
        let cells = (0..BAR_WIDTH)
            .filter(|i| f64::from(*i) + 0.5 < scaled)
            .count();

        println!(
            "{} {}",
            swatch(&slice.color, &"█".repeat(cells.max(1))),
            slice.legend()
        );
    }
}

/// `text` drawn in `color` when it's a `#rrggbb` hex string, plain otherwise.
pub fn swatch(color: &str, text: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }

    let channel = |range: Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
