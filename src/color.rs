use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a hex color string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color string is empty")]
    Empty,

    #[error("expected 3 or 6 hex digits, got {0:?}")]
    InvalidLength(String),

    #[error("invalid hex digits in {0:?}")]
    InvalidDigit(String),
}

/// An opaque 8-bit RGB triple, stored as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parses `#rrggbb`, `rrggbb` or the short `#rgb` form.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(hex.to_owned()));
        }

        let expanded = match digits.len() {
            6 => digits.to_owned(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ColorParseError::InvalidLength(hex.to_owned())),
        };

        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|_| ColorParseError::InvalidDigit(hex.to_owned()))?;

        Ok(Self([
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// The color with the given alpha, ready to draw with.
    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, alpha])
    }

    pub fn opaque(self) -> Rgba<u8> {
        self.with_alpha(255)
    }

    pub fn to_array(self) -> [u8; 3] {
        self.0
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(rgb: [u8; 3]) -> Self {
        Self(rgb)
    }
}
