//! Materials
//!
//! A material names the shading function a draw uses together with its color
//! parameters. Two properties matter to the recorder:
//!
//! - **Batching**: draws that share a [`MaterialId`] can be submitted with one
//!   pipeline state, so the id is folded into the sort key.
//! - **Transparency**: transparent draws must be replayed back to front.

use crate::color::Color;

/// Side length of the reference surface the blend functions are laid out on
pub const REFERENCE_SIZE: i32 = 256;

/// Dense material family id, used only for ordering
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u8);

impl MaterialId {
    pub const SOLID: MaterialId = MaterialId(0);
    pub const LINEAR: MaterialId = MaterialId(1);
    pub const RADIAL: MaterialId = MaterialId(2);
}

/// Shading function plus its colors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// A single flat color
    Solid(Color),
    /// Blend from `from` at the top-left corner to `to` at the bottom-right
    Linear { from: Color, to: Color },
    /// Blend from `from` at the surface center to `to` at the inscribed circle
    Radial { from: Color, to: Color },
}

impl Default for Material {
    fn default() -> Self {
        Material::Solid(Color::BLACK)
    }
}

impl From<Color> for Material {
    fn from(color: Color) -> Self {
        Material::Solid(color)
    }
}

impl Material {
    pub const fn linear(from: Color, to: Color) -> Self {
        Material::Linear { from, to }
    }

    pub const fn radial(from: Color, to: Color) -> Self {
        Material::Radial { from, to }
    }

    /// Whether draws with this material need back-to-front ordering
    ///
    /// A blend counts as transparent only when neither endpoint is opaque.
    pub fn is_transparent(&self) -> bool {
        match *self {
            Material::Solid(color) => !color.is_opaque(),
            Material::Linear { from, to } | Material::Radial { from, to } => {
                !from.is_opaque() && !to.is_opaque()
            }
        }
    }

    /// Material family id for the sort key
    pub fn material_id(&self) -> MaterialId {
        match self {
            Material::Solid(_) => MaterialId::SOLID,
            Material::Linear { .. } => MaterialId::LINEAR,
            Material::Radial { .. } => MaterialId::RADIAL,
        }
    }

    /// Evaluate the shading function at a device pixel
    pub fn eval_color(&self, x: i32, y: i32) -> Color {
        match *self {
            Material::Solid(color) => color,
            Material::Linear { from, to } => {
                // Projection onto the main diagonal, normalized by its length.
                let t = (x + y) as f32 / (2 * REFERENCE_SIZE) as f32;
                from.lerp(to, t)
            }
            Material::Radial { from, to } => {
                let half = REFERENCE_SIZE / 2;
                let dx = (x - half) as f32;
                let dy = (y - half) as f32;
                let dist = (dx * dx + dy * dy).sqrt() / half as f32;
                if dist > 1.0 {
                    from
                } else {
                    from.lerp(to, dist)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_RED: Color = Color::new(0xFF, 0, 0, 0x80);
    const HALF_BLUE: Color = Color::new(0, 0, 0xFF, 0x80);

    #[test]
    fn test_solid_transparency_follows_alpha() {
        assert!(!Material::Solid(Color::RED).is_transparent());
        assert!(Material::Solid(HALF_RED).is_transparent());
        assert!(Material::Solid(Color::TRANSPARENT).is_transparent());
    }

    #[test]
    fn test_blend_is_transparent_only_if_both_endpoints_are() {
        assert!(!Material::linear(Color::RED, HALF_BLUE).is_transparent());
        assert!(!Material::radial(HALF_RED, Color::BLUE).is_transparent());
        assert!(!Material::linear(Color::RED, Color::BLUE).is_transparent());
        assert!(Material::linear(HALF_RED, HALF_BLUE).is_transparent());
        assert!(Material::radial(HALF_RED, HALF_BLUE).is_transparent());
    }

    #[test]
    fn test_material_ids_are_dense_and_distinct() {
        assert_eq!(Material::Solid(Color::RED).material_id(), MaterialId(0));
        assert_eq!(
            Material::linear(Color::RED, Color::BLUE).material_id(),
            MaterialId(1)
        );
        assert_eq!(
            Material::radial(Color::RED, Color::BLUE).material_id(),
            MaterialId(2)
        );
    }

    #[test]
    fn test_eval_color_endpoints() {
        let solid = Material::Solid(HALF_RED);
        assert_eq!(solid.eval_color(17, 200), HALF_RED);

        let linear = Material::linear(Color::RED, Color::BLUE);
        assert_eq!(linear.eval_color(0, 0), Color::RED);
        assert_eq!(linear.eval_color(256, 256), Color::BLUE);

        let radial = Material::radial(Color::RED, Color::BLUE);
        assert_eq!(radial.eval_color(128, 128), Color::RED);
        assert_eq!(radial.eval_color(256, 128), Color::BLUE);
        // Outside the unit circle the start color is used.
        assert_eq!(radial.eval_color(0, 0), Color::RED);
    }
}
