//! zorder paint primitives
//!
//! Leaf types shared by the recorder and its consumers.
//!
//! # Features
//!
//! - Integer geometry (points and half-open rectangles)
//! - 8-bit RGBA colors with hex parsing
//! - Materials: solid colors, linear and radial two-color blends

pub mod color;
pub mod material;
pub mod primitives;

pub use color::{Color, ParseColorError};
pub use material::{Material, MaterialId};
pub use primitives::{IPoint, IRect};
