//! Color types and utilities

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// RGBA color with 8-bit components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const TRANSPARENT: Color = Color::new(0x00, 0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Create from a packed `0xAARRGGBB` value
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Set alpha and return new color
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Alpha channel is fully opaque
    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }

    /// Linearly blend towards `other`: `t == 0` yields `self`, `t == 1` yields `other`
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = f32::from(a) * (1.0 - t) + f32::from(b) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Error returned when parsing a hex color string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),

    #[error("color must have 6 or 8 hex digits: {0:?}")]
    BadLength(String),

    #[error("invalid hex digits in color: {0:?}")]
    BadDigit(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#rrggbb` or `#rrggbbaa`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError::MissingHash(s.to_string()))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ParseColorError::BadLength(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ParseColorError::BadDigit(s.to_string()))?;

        Ok(if hex.len() == 6 {
            Color::from_argb(0xFF00_0000 | value)
        } else {
            Color::new(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        let c = Color::from_argb(0x80FF_0010);
        assert_eq!(c, Color::new(0xFF, 0x00, 0x10, 0x80));
        assert!(!c.is_opaque());
        assert!(Color::RED.is_opaque());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#ff0000".parse::<Color>(), Ok(Color::RED));
        assert_eq!(
            "#0000ff80".parse::<Color>(),
            Ok(Color::BLUE.with_alpha(0x80))
        );
        assert!(matches!(
            "ff0000".parse::<Color>(),
            Err(ParseColorError::MissingHash(_))
        ));
        assert!(matches!(
            "#fff".parse::<Color>(),
            Err(ParseColorError::BadLength(_))
        ));
        assert!(matches!(
            "#gg0000".parse::<Color>(),
            Err(ParseColorError::BadDigit(_))
        ));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::RED;
        let b = Color::BLUE.with_alpha(0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(128, 0, 128, 128));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let c = Color::new(1, 2, 3, 4);
        assert_eq!(c.to_string(), "#01020304");
        assert_eq!(c.to_string().parse::<Color>(), Ok(c));
    }
}
