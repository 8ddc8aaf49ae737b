//! Textual color encodings

use crate::{ColorFormat, Hsl, Hsv, Rgba};

/// Format a color in the given encoding. Total for every 8-bit input.
pub fn format_color(c: Rgba, format: ColorFormat) -> String {
    match format {
        ColorFormat::Html => format!("{:02X}{:02X}{:02X}", c.r, c.g, c.b),
        ColorFormat::Hex => format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b),
        ColorFormat::DelphiHex => format!("$00{:02X}{:02X}{:02X}", c.b, c.g, c.r),
        ColorFormat::VbHex => format!("&H00{:02X}{:02X}{:02X}&", c.b, c.g, c.r),
        ColorFormat::Rgba => format!(
            "rgba({}, {}, {}, {:.2})",
            c.r,
            c.g,
            c.b,
            fraction(c.a)
        ),
        ColorFormat::Rgb => format!("rgb({}, {}, {})", c.r, c.g, c.b),
        ColorFormat::RgbFloat => format!(
            "{:.3}, {:.3}, {:.3}",
            fraction(c.r),
            fraction(c.g),
            fraction(c.b)
        ),
        ColorFormat::Hsv => {
            let hsv = Hsv::from(c);
            format!(
                "hsv({}, {}%, {}%)",
                hsv.hue.unwrap_or(0),
                percent(hsv.saturation),
                percent(hsv.value)
            )
        }
        ColorFormat::Hsl => {
            let hsl = Hsl::from(c);
            format!(
                "hsl({}, {}%, {}%)",
                hsl.hue.unwrap_or(0),
                percent(hsl.saturation),
                percent(hsl.lightness)
            )
        }
    }
}

fn fraction(channel: u8) -> f64 {
    channel as f64 / 255.0
}

fn percent(channel: u8) -> u32 {
    channel as u32 * 100 / 255
}
