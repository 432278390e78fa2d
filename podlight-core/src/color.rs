//! Light colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PodlightError, PodlightResult};

/// An additive color with 8-bit channels, written as `RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent: the light is effectively off.
    pub const OFF: Color = Color::new(0x00, 0x00, 0x00, 0x00);
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xFF, 0xFF);
    /// Blue channel off, only the last channel lit.
    pub const DIM_BLUE: Color = Color::new(0x00, 0x00, 0x00, 0xFF);
    pub const GREEN: Color = Color::new(0x00, 0xFF, 0x00, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Parse exactly 8 hex digits in `RRGGBBAA` order, nothing else.
    pub fn parse(s: &str) -> PodlightResult<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PodlightError::InvalidColorFormat(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| PodlightError::InvalidColorFormat(s.to_string()))
        };

        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: channel(6)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = PodlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = PodlightError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
