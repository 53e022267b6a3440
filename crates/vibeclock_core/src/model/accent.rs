//! Position-derived accent colours.

use serde::Serialize;

/// Fixed accent palette, cycled by list position.
pub const ACCENT_PALETTE: [&str; 12] = [
    "oklch(0.65 0.20 15)",  // warm red
    "oklch(0.65 0.18 250)", // blue
    "oklch(0.60 0.15 145)", // green
    "oklch(0.65 0.18 300)", // purple
    "oklch(0.65 0.15 185)", // teal
    "oklch(0.70 0.16 55)",  // amber
    "oklch(0.62 0.18 340)", // pink
    "oklch(0.68 0.14 220)", // sky blue
    "oklch(0.60 0.16 120)", // emerald
    "oklch(0.72 0.15 80)",  // gold
    "oklch(0.58 0.18 270)", // indigo
    "oklch(0.66 0.14 160)", // cyan
];

/// Palette entry assigned to one selected city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accent {
    /// Index into [`ACCENT_PALETTE`].
    pub index: usize,
    pub color: &'static str,
}

impl Accent {
    /// Accent for list position `position`, wrapping around the palette.
    pub fn for_position(position: usize) -> Self {
        let index = position % ACCENT_PALETTE.len();
        Self {
            index,
            color: ACCENT_PALETTE[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Accent, ACCENT_PALETTE};

    #[test]
    fn accent_cycles_with_wraparound() {
        let n = ACCENT_PALETTE.len();
        for k in [0, 1, n - 1, n, n + 1, 5 * n + 3, 1_000_003] {
            let accent = Accent::for_position(k);
            assert_eq!(accent.index, k % n);
            assert_eq!(accent.color, ACCENT_PALETTE[k % n]);
        }
    }
}
