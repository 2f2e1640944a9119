use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ColourParseError;

/// A sampled wall colour in display space.
///
/// Created once per sample and never mutated; the next sample replaces it.
/// Serialises as its lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PaintColour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaintColour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Canonical 7-character `#rrggbb` form, always lowercase.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear light value for physically based material channels.
    pub fn to_linear(&self) -> LinearRgba {
        LinearRgba::from(Srgba::rgb_u8(self.r, self.g, self.b))
    }

    /// Colour for unlit UI swatches, which take display-space values.
    pub fn display_colour(&self) -> Color {
        Color::srgb_u8(self.r, self.g, self.b)
    }
}

impl fmt::Display for PaintColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for PaintColour {
    type Err = ColourParseError;

    /// Accepts `#rrggbb` or `rrggbb` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColourParseError::Length(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColourParseError::Digit(s.to_string()))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for PaintColour {
    type Error = ColourParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaintColour> for String {
    fn from(colour: PaintColour) -> Self {
        colour.hex()
    }
}
