// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color parsing and WCAG contrast ratio calculation
//!
//! Colors are parsed from their CSS text (`rgb()`, `rgba()`, hex, and a
//! handful of named colors) into sRGB triples. Luminance follows the WCAG 2.x
//! definition:
//! - channels normalized to [0, 1]
//! - `c / 12.92` when `c <= 0.03928`, else `((c + 0.055) / 1.055) ^ 2.4`
//! - `L = 0.2126 R + 0.7152 G + 0.0722 B`
//! - ratio `(L1 + 0.05) / (L2 + 0.05)` with `L1` the lighter color

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*[,\s]\s*(\d{1,3})\s*[,\s]\s*(\d{1,3})\s*(?:[,/]\s*[\d.]+%?\s*)?\)$")
        .expect("valid regex")
});

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to [0, 1]
    pub fn normalized(&self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| f64::from(c) / 255.0)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Parse a CSS hex color (#rgb, #rrggbb) into its channels
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

/// Parse an `rgb()` or `rgba()` color; alpha is ignored
pub fn parse_rgb_color(value: &str) -> Option<Rgb> {
    let caps = RGB_RE.captures(value)?;
    let r: u8 = caps[1].parse().ok()?;
    let g: u8 = caps[2].parse().ok()?;
    let b: u8 = caps[3].parse().ok()?;
    Some(Rgb::new(r, g, b))
}

/// Parse a named CSS color
pub fn parse_named_color(name: &str) -> Option<Rgb> {
    let (r, g, b) = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        _ => return None,
    };
    Some(Rgb::new(r, g, b))
}

/// Parse any supported CSS color value
pub fn parse_color(value: &str) -> Option<Rgb> {
    let trimmed = value.trim().to_ascii_lowercase();
    if trimmed.starts_with('#') {
        parse_hex_color(&trimmed)
    } else if trimmed.starts_with("rgb") {
        parse_rgb_color(&trimmed)
    } else {
        parse_named_color(&trimmed)
    }
}

/// Relative luminance per WCAG 2.x
pub fn relative_luminance(color: Rgb) -> f64 {
    let [r, g, b] = color.normalized().map(|c| {
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Contrast ratio between two colors, in [1.0, 21.0]
pub fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);
    (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05)
}

/// Contrast ratio of two CSS color strings, `None` if either does not parse
pub fn contrast_ratio_str(fg: &str, bg: &str) -> Option<f64> {
    Some(contrast_ratio(parse_color(fg)?, parse_color(bg)?))
}
