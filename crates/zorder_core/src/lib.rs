//! zorder core
//!
//! Records a stream of draw calls together with the clip/transform state and
//! material active at each call, then computes a single replay order that
//!
//! - keeps transparent draws in painter's order and after all opaque draws,
//! - clusters opaque draws by material and issues them front to back, and
//! - resolves the per-pixel winner with a depth buffer rather than with
//!   submission order.
//!
//! # Architecture
//!
//! ```text
//!   Canvas            assigns submission depths
//!     │
//!     ▼
//!   Device            StateStack ──snapshot()──▶ Arc<StateSnapshot>
//!     │                                              │
//!     ▼                                              ▼
//!   [(OrderKey, DrawCommand)] ──finalize()──▶ sorted + depth buffer
//! ```
//!
//! # Example
//!
//! ```rust
//! use zorder_core::Canvas;
//! use zorder_paint::{Color, IRect, Material};
//!
//! let mut canvas = Canvas::with_default_surface();
//! let r = IRect::new(0, 0, 100, 100);
//!
//! canvas.draw_rect(1, r, Material::Solid(Color::RED))?;
//! canvas.clip_rect(IRect::new(10, 10, 50, 50))?;
//! canvas.draw_rect(2, r, Material::Solid(Color::BLUE.with_alpha(0x80)))?;
//! canvas.translate(10, 0)?;
//! canvas.draw_rect(3, r, Material::Solid(Color::RED))?;
//!
//! canvas.finalize()?;
//! assert_eq!(canvas.get_order()?, vec![3, 1, 2]);
//! # Ok::<(), zorder_core::RecordError>(())
//! ```

pub mod canvas;
pub mod command;
pub mod config;
pub mod depth;
pub mod device;
pub mod error;
pub mod key;
pub mod scene;
pub mod state;

pub use canvas::Canvas;
pub use command::{DrawCommand, DrawId};
pub use config::{SurfaceConfig, MAX_SURFACE_DIM};
pub use depth::DepthBuffer;
pub use device::{Device, FinalizeStats, Fragment, FragmentSink};
pub use error::{RecordError, Result};
pub use key::OrderKey;
pub use scene::{Scene, SceneError, SceneOp};
pub use state::{
    ResolvedFrame, SnapshotId, StateFrame, StateSnapshot, StateStack, StateTransition,
};
