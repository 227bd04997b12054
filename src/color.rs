//! Hex color parsing and contrast text color selection.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

pub const DARK_TEXT: &str = "#000000";
pub const LIGHT_TEXT: &str = "#FFFFFF";

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some((
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn channel(hex: &str) -> Option<u8> {
    match u8::from_str_radix(hex, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Relative luminance in `[0, 1]` using the Rec. 601 weights.
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
}

/// Text color that stays readable on `background`: black on light fills, white otherwise.
///
/// Unparseable backgrounds get white text.
#[must_use]
pub fn contrast_text_color(background: &str) -> &'static str {
    match parse_hex_rgb(background) {
        Some((r, g, b)) if luminance(r, g, b) > 0.5 => DARK_TEXT,
        _ => LIGHT_TEXT,
    }
}
