//! Dashboard color theme (neon on black).

use serde::{Serialize, Serializer};

/// 8-bit RGB color, serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

pub const NEON_MAGENTA: Rgb = Rgb(255, 0, 255);
pub const NEON_CYAN: Rgb = Rgb(0, 255, 255);
pub const NEON_ORANGE: Rgb = Rgb(255, 102, 0);
pub const DARK_BG: Rgb = Rgb(0, 0, 0);
pub const LIGHT_BG: Rgb = Rgb(17, 17, 17);
pub const TEXT_COLOR: Rgb = Rgb(255, 255, 255);
pub const GRID_COLOR: Rgb = Rgb(51, 51, 51);

/// Three-stop gradient used for the break-even bars: magenta -> cyan -> orange.
pub fn gradient(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let (from, to, local) = if t < 0.5 {
        (NEON_MAGENTA, NEON_CYAN, t * 2.0)
    } else {
        (NEON_CYAN, NEON_ORANGE, (t - 0.5) * 2.0)
    };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;
    Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}
