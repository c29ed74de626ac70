//! Scene files
//!
//! A scene is a TOML description of a recording session: an optional
//! `[surface]` table and an ordered `[[op]]` array replayed against a fresh
//! [`Canvas`].
//!
//! ```toml
//! [surface]
//! width = 256
//! height = 256
//!
//! [[op]]
//! kind = "draw"
//! id = 1
//! rect = [0, 0, 100, 100]
//! material = { kind = "solid", color = "#ff0000" }
//!
//! [[op]]
//! kind = "clip"
//! rect = [10, 10, 50, 50]
//!
//! [[op]]
//! kind = "translate"
//! dx = 10
//! dy = 0
//! ```

use serde::Deserialize;
use thiserror::Error;
use zorder_paint::{Color, IRect, Material, ParseColorError};

use crate::canvas::Canvas;
use crate::command::DrawId;
use crate::config::SurfaceConfig;
use crate::error::RecordError;

/// Errors raised while loading or recording a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// Malformed TOML or unknown op kinds
    #[error("scene parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A material color could not be parsed
    #[error("op {index}: {source}")]
    Color {
        index: usize,
        #[source]
        source: ParseColorError,
    },

    /// The canvas rejected an op
    #[error("op {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: RecordError,
    },

    /// The surface table is invalid
    #[error(transparent)]
    Surface(RecordError),
}

/// `[x, y, width, height]`
pub type RectSpec = [i32; 4];

fn to_rect([x, y, width, height]: RectSpec) -> IRect {
    IRect::new(x, y, width, height)
}

/// Material as written in a scene file, colors as `#rrggbb[aa]`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterialSpec {
    Solid { color: String },
    Linear { from: String, to: String },
    Radial { from: String, to: String },
}

impl MaterialSpec {
    pub fn to_material(&self) -> Result<Material, ParseColorError> {
        Ok(match self {
            MaterialSpec::Solid { color } => Material::Solid(color.parse()?),
            MaterialSpec::Linear { from, to } => {
                Material::linear(from.parse::<Color>()?, to.parse::<Color>()?)
            }
            MaterialSpec::Radial { from, to } => {
                Material::radial(from.parse::<Color>()?, to.parse::<Color>()?)
            }
        })
    }
}

/// One recording call
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneOp {
    Save,
    SaveLayer,
    Restore,
    Clip {
        rect: RectSpec,
    },
    Translate {
        #[serde(default)]
        dx: i32,
        #[serde(default)]
        dy: i32,
    },
    Draw {
        id: DrawId,
        rect: RectSpec,
        material: MaterialSpec,
    },
}

/// A parsed scene file
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default, rename = "op")]
    pub ops: Vec<SceneOp>,
}

impl Scene {
    pub fn from_toml_str(source: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(source)?)
    }

    /// Replay the ops into a new canvas, left unfinalized
    pub fn record(&self) -> Result<Canvas, SceneError> {
        let mut canvas = Canvas::new(self.surface).map_err(SceneError::Surface)?;

        for (index, op) in self.ops.iter().enumerate() {
            let result = match op {
                SceneOp::Save => canvas.save(),
                SceneOp::SaveLayer => canvas.save_layer(),
                SceneOp::Restore => canvas.restore(),
                SceneOp::Clip { rect } => canvas.clip_rect(to_rect(*rect)),
                SceneOp::Translate { dx, dy } => canvas.translate(*dx, *dy),
                SceneOp::Draw { id, rect, material } => {
                    let material = material
                        .to_material()
                        .map_err(|source| SceneError::Color { index, source })?;
                    canvas.draw_rect(*id, to_rect(*rect), material)
                }
            };
            result.map_err(|source| SceneError::Record { index, source })?;
        }

        tracing::debug!(ops = self.ops.len(), "scene recorded");
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"
        [surface]
        width = 64
        height = 32

        [[op]]
        kind = "draw"
        id = 1
        rect = [0, 0, 10, 10]
        material = { kind = "solid", color = "#ff0000" }

        [[op]]
        kind = "save"

        [[op]]
        kind = "clip"
        rect = [2, 2, 4, 4]

        [[op]]
        kind = "draw"
        id = 2
        rect = [0, 0, 10, 10]
        material = { kind = "linear", from = "#ff000080", to = "#0000ff80" }

        [[op]]
        kind = "restore"

        [[op]]
        kind = "translate"
        dx = 5
    "##;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        assert_eq!(scene.surface, SurfaceConfig::new(64, 32));
        assert_eq!(scene.ops.len(), 6);
        assert_eq!(scene.ops[1], SceneOp::Save);
        assert_eq!(scene.ops[5], SceneOp::Translate { dx: 5, dy: 0 });
        assert_eq!(
            scene.ops[3],
            SceneOp::Draw {
                id: 2,
                rect: [0, 0, 10, 10],
                material: MaterialSpec::Linear {
                    from: "#ff000080".into(),
                    to: "#0000ff80".into()
                },
            }
        );
    }

    #[test]
    fn test_record_scene() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        let mut canvas = scene.record().unwrap();
        assert_eq!(canvas.device().len(), 2);
        assert_eq!(canvas.device().save_count(), 1);

        canvas.finalize().unwrap();
        assert_eq!(canvas.get_order().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_empty_scene_uses_defaults() {
        let scene = Scene::from_toml_str("").unwrap();
        assert_eq!(scene.surface, SurfaceConfig::default());
        assert!(scene.ops.is_empty());
    }

    #[test]
    fn test_errors_carry_op_index() {
        let scene = Scene::from_toml_str("[[op]]\nkind = \"save\"\n[[op]]\nkind = \"restore\"\n[[op]]\nkind = \"restore\"").unwrap();
        match scene.record() {
            Err(SceneError::Record { index, source }) => {
                assert_eq!(index, 2);
                assert_eq!(source, RecordError::UnbalancedRestore);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let scene = Scene::from_toml_str(
            "[[op]]\nkind = \"draw\"\nid = 1\nrect = [0, 0, 1, 1]\nmaterial = { kind = \"solid\", color = \"red\" }",
        )
        .unwrap();
        assert!(matches!(
            scene.record(),
            Err(SceneError::Color { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_op_is_a_parse_error() {
        assert!(matches!(
            Scene::from_toml_str("[[op]]\nkind = \"rotate\""),
            Err(SceneError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_surface_is_reported() {
        let scene = Scene::from_toml_str("[surface]\nwidth = 0").unwrap();
        assert!(matches!(
            scene.record(),
            Err(SceneError::Surface(RecordError::InvalidSurface { .. }))
        ));
    }
}
