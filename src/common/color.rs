use std::{fmt, str::FromStr};

use image::Rgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ColorParseError;

/// An 8-bit RGB triple. Every component is in `0..=255` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV representation of a [`Color`].
///
/// `h` is in degrees within `[0, 360)`, `s` and `v` are within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Color {
    /// Neutral mid-gray used when an image decodes to no pixels at all.
    pub const FALLBACK: Color = Color::new(127, 127, 127);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#RRGGBB"` or `"RRGGBB"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits = hex.chars().count();
        if digits != 6 {
            return Err(ColorParseError::Length(digits));
        }
        // from_str_radix alone would accept a leading '+'
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::NotHex(hex.to_string()));
        }
        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorParseError::NotHex(hex.to_string()))
        };
        Ok(Self {
            r: component(0..2)?,
            g: component(2..4)?,
            b: component(4..6)?,
        })
    }

    /// Uppercase `#RRGGBB`, each channel zero-padded to two digits.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_hsv(&self) -> Hsv {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            (60.0 * ((g - b) / delta) + 360.0) % 360.0
        } else if max == g {
            (60.0 * ((b - r) / delta) + 120.0) % 360.0
        } else {
            (60.0 * ((r - g) / delta) + 240.0) % 360.0
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv { h, s, v: max }
    }

    pub fn hue(&self) -> f64 {
        self.to_hsv().h
    }
}

impl From<Rgb<u8>> for Color {
    fn from(px: Rgb<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
