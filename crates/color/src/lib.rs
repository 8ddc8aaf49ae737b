//! Color module for ColorPick
//!
//! Provides the sampled color type and its textual encodings.

mod convert;
mod format;

pub use convert::{Hsl, Hsv};
pub use format::format_color;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("Unknown color format index: {0}")]
    UnknownIndex(usize),

    #[error("Unknown color format: {0}")]
    UnknownName(String),
}

pub type ColorResult<T> = Result<T, ColorError>;

/// 8-bit RGBA sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Pack as 0xAARRGGBB
    pub fn to_argb_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(p: [u8; 4]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
}

/// Text encoding applied to a picked color.
///
/// The discriminants are the persisted indices and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorFormat {
    /// `RRGGBB`
    #[default]
    Html = 0,
    /// `#RRGGBB`
    Hex = 1,
    /// `$00BBGGRR`
    DelphiHex = 2,
    /// `&H00BBGGRR&`
    VbHex = 3,
    /// `rgba(r, g, b, a)`
    Rgba = 4,
    /// `rgb(r, g, b)`
    Rgb = 5,
    /// `r.rrr, g.ggg, b.bbb`
    RgbFloat = 6,
    /// `hsv(h, s%, v%)`
    Hsv = 7,
    /// `hsl(h, s%, l%)`
    Hsl = 8,
}

impl ColorFormat {
    pub const ALL: [ColorFormat; 9] = [
        ColorFormat::Html,
        ColorFormat::Hex,
        ColorFormat::DelphiHex,
        ColorFormat::VbHex,
        ColorFormat::Rgba,
        ColorFormat::Rgb,
        ColorFormat::RgbFloat,
        ColorFormat::Hsv,
        ColorFormat::Hsl,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> ColorResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ColorError::UnknownIndex(index))
    }

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            ColorFormat::Html => "html",
            ColorFormat::Hex => "hex",
            ColorFormat::DelphiHex => "delphi",
            ColorFormat::VbHex => "vb",
            ColorFormat::Rgba => "rgba",
            ColorFormat::Rgb => "rgb",
            ColorFormat::RgbFloat => "float",
            ColorFormat::Hsv => "hsv",
            ColorFormat::Hsl => "hsl",
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            ColorFormat::Html => "HTML (RRGGBB)",
            ColorFormat::Hex => "HEX (#RRGGBB)",
            ColorFormat::DelphiHex => "Delphi Hex ($00BBGGRR)",
            ColorFormat::VbHex => "Visual Basic Hex (&H00BBGGRR&)",
            ColorFormat::Rgba => "RGBA",
            ColorFormat::Rgb => "RGB",
            ColorFormat::RgbFloat => "RGB Float",
            ColorFormat::Hsv => "HSV (HSB)",
            ColorFormat::Hsl => "HSL",
        }
    }

    /// Format a color with this encoding
    pub fn format(self, color: Rgba) -> String {
        format_color(color, self)
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorFormat {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| ColorError::UnknownName(s.to_string()))
    }
}
