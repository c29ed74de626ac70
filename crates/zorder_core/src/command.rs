//! Recorded draw commands

use std::sync::Arc;

use zorder_paint::{IRect, Material};

use crate::state::StateSnapshot;

/// Caller-chosen draw identifier, opaque to the recorder
pub type DrawId = i32;

/// One recorded draw, immutable once created
#[derive(Clone, Debug)]
pub struct DrawCommand {
    id: DrawId,
    /// Shape in the local space of `state`
    shape: IRect,
    depth: u32,
    material: Material,
    state: Arc<StateSnapshot>,
}

impl DrawCommand {
    pub fn new(
        id: DrawId,
        depth: u32,
        shape: IRect,
        material: Material,
        state: Arc<StateSnapshot>,
    ) -> Self {
        Self {
            id,
            shape,
            depth,
            material,
            state,
        }
    }

    pub fn id(&self) -> DrawId {
        self.id
    }

    pub fn shape(&self) -> IRect {
        self.shape
    }

    /// Shape translated into device space
    pub fn device_shape(&self) -> IRect {
        self.shape.offset(self.state.ctm())
    }

    /// Submission depth, strictly increasing in program order
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn state(&self) -> &Arc<StateSnapshot> {
        &self.state
    }

    pub fn is_transparent(&self) -> bool {
        self.material.is_transparent()
    }
}
