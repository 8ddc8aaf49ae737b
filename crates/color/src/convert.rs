//! HSV / HSL conversion
//!
//! Channels are carried at 16-bit precision and reduced to an 8-bit range
//! afterwards, so percentages come out as `channel8 * 100 / 255`.

use crate::Rgba;

const CHANNEL_MAX: f64 = u16::MAX as f64;

/// Hue in whole degrees, saturation and value in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// `None` for achromatic colors
    pub hue: Option<u16>,
    pub saturation: u8,
    pub value: u8,
}

/// Hue in whole degrees, saturation and lightness in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    /// `None` for achromatic colors
    pub hue: Option<u16>,
    pub saturation: u8,
    pub lightness: u8,
}

struct Extremes {
    r: f64,
    g: f64,
    b: f64,
    max: f64,
    min: f64,
}

impl Extremes {
    fn of(c: Rgba) -> Self {
        let r = c.r as f64 / 255.0;
        let g = c.g as f64 / 255.0;
        let b = c.b as f64 / 255.0;
        Self {
            r,
            g,
            b,
            max: r.max(g).max(b),
            min: r.min(g).min(b),
        }
    }

    fn delta(&self) -> f64 {
        self.max - self.min
    }

    fn hue(&self) -> Option<u16> {
        let delta = self.delta();
        if delta <= f64::EPSILON {
            return None;
        }

        let mut hue = if self.r == self.max {
            (self.g - self.b) / delta
        } else if self.g == self.max {
            2.0 + (self.b - self.r) / delta
        } else {
            4.0 + (self.r - self.g) / delta
        };
        hue *= 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }

        // Centidegrees, then truncate to whole degrees
        let centi = round_half_up(hue * 100.0) as u32;
        Some(((centi / 100) % 360) as u16)
    }
}

fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Scale a `0.0..=1.0` fraction to 16 bits, then keep the high byte.
fn reduce(fraction: f64) -> u8 {
    let wide = round_half_up(fraction * CHANNEL_MAX).clamp(0, u16::MAX as i64) as u16;
    (wide >> 8) as u8
}

impl From<Rgba> for Hsv {
    fn from(c: Rgba) -> Self {
        let e = Extremes::of(c);
        let delta = e.delta();
        let saturation = if delta <= f64::EPSILON {
            0
        } else {
            reduce(delta / e.max)
        };

        Self {
            hue: e.hue(),
            saturation,
            value: reduce(e.max),
        }
    }
}

impl From<Rgba> for Hsl {
    fn from(c: Rgba) -> Self {
        let e = Extremes::of(c);
        let delta = e.delta();
        let sum = e.max + e.min;
        let lightness = 0.5 * sum;

        let saturation = if delta <= f64::EPSILON {
            0
        } else if lightness < 0.5 {
            reduce(delta / sum)
        } else {
            reduce(delta / (2.0 - sum))
        };

        Self {
            hue: e.hue(),
            saturation,
            lightness: reduce(lightness),
        }
    }
}
