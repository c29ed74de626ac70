//! Canvas - the recording front-end
//!
//! The canvas assigns submission depths and forwards every call to the
//! active device. It keeps a device stack so offscreen layers can slot in
//! later; today the stack always holds exactly the surface device.
//!
//! ```
//! use zorder_core::Canvas;
//! use zorder_paint::{Color, IRect, Material};
//!
//! let mut canvas = Canvas::with_default_surface();
//! let r = IRect::new(0, 0, 32, 32);
//! canvas.draw_rect(1, r, Material::Solid(Color::RED))?;
//! canvas.draw_rect(2, r, Material::Solid(Color::BLUE.with_alpha(0x80)))?;
//! canvas.draw_rect(3, r, Material::Solid(Color::RED))?;
//! canvas.finalize()?;
//!
//! assert_eq!(canvas.get_order()?, vec![3, 1, 2]);
//! # Ok::<(), zorder_core::RecordError>(())
//! ```

use std::sync::Arc;

use zorder_paint::{IPoint, IRect, Material};

use crate::command::DrawId;
use crate::config::SurfaceConfig;
use crate::device::{Device, FinalizeStats};
use crate::error::{RecordError, Result};
use crate::state::StateSnapshot;

/// Recording canvas over a stack of devices
#[derive(Debug)]
pub struct Canvas {
    device_stack: Vec<Device>,
    next_depth: u32,
    finalized: bool,
}

impl Canvas {
    pub fn new(surface: SurfaceConfig) -> Result<Self> {
        Ok(Self {
            device_stack: vec![Device::new(surface)?],
            next_depth: 1,
            finalized: false,
        })
    }

    /// Canvas over a 256x256 surface
    pub fn with_default_surface() -> Self {
        Self {
            device_stack: vec![Device::default()],
            next_depth: 1,
            finalized: false,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The device currently receiving calls
    pub fn device(&self) -> &Device {
        self.device_stack
            .last()
            .unwrap_or_else(|| unreachable!("canvas has no device"))
    }

    fn active_mut(&mut self) -> &mut Device {
        self.device_stack
            .last_mut()
            .unwrap_or_else(|| unreachable!("canvas has no device"))
    }

    /// Active device, if the canvas is still recording
    fn device_mut(&mut self) -> Result<&mut Device> {
        if self.finalized {
            return Err(RecordError::Finalized);
        }
        Ok(self.active_mut())
    }

    pub fn devices(&self) -> &[Device] {
        &self.device_stack
    }

    pub fn save(&mut self) -> Result<()> {
        self.device_mut()?.save()
    }

    /// Open a layer scope
    ///
    /// Offscreen compositing is not implemented: the layer behaves as a plain
    /// save so the matching `restore` stays balanced.
    pub fn save_layer(&mut self) -> Result<()> {
        let device = self.device_mut()?;
        tracing::warn!("save_layer has no offscreen support; recording a plain save");
        device.save()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.device_mut()?.restore()
    }

    pub fn clip_rect(&mut self, rect: IRect) -> Result<()> {
        self.device_mut()?.clip_rect(rect)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.device_mut()?.translate(IPoint::new(dx, dy))
    }

    /// Record a rectangle with the next submission depth
    pub fn draw_rect(
        &mut self,
        id: DrawId,
        rect: IRect,
        material: impl Into<Material>,
    ) -> Result<()> {
        let depth = self.next_depth;
        self.device_mut()?.draw_rect(id, depth, rect, material.into())?;
        self.next_depth += 1;
        Ok(())
    }

    /// Current clip/transform state of the active device
    pub fn snap_state(&mut self) -> Arc<StateSnapshot> {
        self.active_mut().snap_state()
    }

    /// Freeze every device and compute the replay order
    ///
    /// Calling this again is a no-op.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;

        for device in &mut self.device_stack {
            device.finalize()?;
        }
        tracing::debug!(
            devices = self.device_stack.len(),
            draws = self.next_depth - 1,
            "canvas finalized"
        );
        Ok(())
    }

    /// Draw ids of all devices in replay order
    pub fn get_order(&self) -> Result<Vec<DrawId>> {
        if !self.finalized {
            return Err(RecordError::NotFinalized);
        }

        let mut ops = Vec::new();
        for device in &self.device_stack {
            ops.extend(device.get_order()?);
        }
        Ok(ops)
    }

    /// Finalize statistics, one entry per device
    pub fn stats(&self) -> Vec<&FinalizeStats> {
        self.device_stack
            .iter()
            .filter_map(Device::stats)
            .collect()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::with_default_surface()
    }
}
