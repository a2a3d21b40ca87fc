//! Process color identity.
//!
//! A color base is a hue/saturation/lightness triple with a free
//! opacity parameter. The opacity is supplied at use time from the
//! resolved cell intensity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Saturation of every process color (percent).
pub const SATURATION: u8 = 65;
/// Lightness of every process color (percent).
pub const LIGHTNESS: u8 = 55;

/// Per-process color identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBase {
    /// Hue in degrees, `0.0..360.0`.
    pub hue: f64,
    /// Saturation in percent.
    pub saturation: u8,
    /// Lightness in percent.
    pub lightness: u8,
}

impl ColorBase {
    /// Creates a base with the fixed saturation and lightness.
    pub fn from_hue(hue: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: SATURATION,
            lightness: LIGHTNESS,
        }
    }

    /// Fills the opacity slot.
    pub fn with_alpha(self, alpha: f64) -> Hsla {
        Hsla {
            base: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Opaque RGB components.
    pub fn to_rgb(&self) -> [u8; 3] {
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.hue / 60.0;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }
}

/// A color base with its opacity filled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub base: ColorBase,
    /// Opacity, `0.0..=1.0`.
    pub alpha: f64,
}

impl Hsla {
    /// RGBA8 components.
    pub fn to_rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.base.to_rgb();
        [r, g, b, (self.alpha * 255.0).round() as u8]
    }

    /// RGB components composited over an opaque background.
    pub fn over(&self, background: [u8; 3]) -> [u8; 3] {
        let fg = self.base.to_rgb();
        let mut out = [0u8; 3];
        for i in 0..3 {
            let blended =
                f64::from(fg[i]) * self.alpha + f64::from(background[i]) * (1.0 - self.alpha);
            out[i] = blended.round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

/// CSS form, e.g. `hsla(137.508, 65%, 55%, 0.3)`.
impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {})",
            self.base.hue, self.base.saturation, self.base.lightness, self.alpha
        )
    }
}
