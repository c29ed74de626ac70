//! Surface configuration

use serde::{Deserialize, Serialize};
use zorder_paint::IRect;

use crate::error::{RecordError, Result};

/// Largest accepted surface side, in pixels
pub const MAX_SURFACE_DIM: u32 = 4096;

/// Fixed resolution of a drawing surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
}

fn default_size() -> u32 {
    256
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
        }
    }
}

impl SurfaceConfig {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject empty surfaces and surfaces above [`MAX_SURFACE_DIM`]
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: u32| (1..=MAX_SURFACE_DIM).contains(&v);
        if in_range(self.width) && in_range(self.height) {
            Ok(())
        } else {
            Err(RecordError::InvalidSurface {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Device-space rectangle covered by the surface
    pub fn bounds(&self) -> IRect {
        // Bounded by MAX_SURFACE_DIM once validated.
        IRect::new(0, 0, self.width as i32, self.height as i32)
    }
}
