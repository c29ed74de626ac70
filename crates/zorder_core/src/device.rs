//! Recording device
//!
//! A `Device` records draws for one surface and turns them into a replay
//! order. Recording is append-only; [`Device::finalize`] sorts the commands
//! by [`OrderKey`] and resolves the depth buffer in that order.
//!
//! # Visibility
//!
//! A fragment of a command contributes to the final image when
//!
//! 1. it lies on the surface and inside the command's device-space shape,
//! 2. it is inside every clip of the command's snapshot, and
//! 3. it wins the depth test: an opaque fragment must be the frontmost opaque
//!    fragment at that pixel, a transparent fragment must lie in front of it.
//!
//! [`Device::replay`] hands exactly those fragments to a [`FragmentSink`],
//! preceded by a [`StateTransition`] whenever the clip/transform state
//! changes between consecutive commands.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::Serialize;
use zorder_paint::{Color, IPoint, IRect, Material};

use crate::command::{DrawCommand, DrawId};
use crate::config::SurfaceConfig;
use crate::depth::DepthBuffer;
use crate::error::{RecordError, Result};
use crate::key::OrderKey;
use crate::state::{StateSnapshot, StateStack, StateTransition};

/// A command together with its sort key
#[derive(Clone, Debug)]
struct KeyedCommand {
    key: OrderKey,
    cmd: DrawCommand,
}

/// Summary of a finalized device
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FinalizeStats {
    /// Number of recorded commands
    pub commands: usize,
    /// Adjacent pairs in replay order with different materials
    pub material_switches: usize,
    /// Adjacent pairs in replay order whose states differ
    pub state_switches: usize,
    /// Frames restored away across all state transitions
    pub frames_popped: usize,
    /// Frames re-applied across all state transitions, including the first
    pub frames_pushed: usize,
    /// Distinct snapshots referenced by the commands
    pub distinct_states: usize,
    /// Fragments that passed clipping and the depth test
    pub fragments_passed: usize,
    /// Fragments that passed clipping but failed the depth test
    pub fragments_rejected: usize,
}

/// A visible fragment produced by [`Device::replay`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub id: DrawId,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    /// The fragment must be blended over what is below it
    pub blend: bool,
}

/// Consumer of replayed fragments, typically a rasterizer
pub trait FragmentSink {
    /// Called before the fragments of a command whose state differs from the
    /// previous command's
    fn state(&mut self, _transition: StateTransition<'_>) {}

    fn fragment(&mut self, fragment: Fragment);
}

impl FragmentSink for Vec<Fragment> {
    fn fragment(&mut self, fragment: Fragment) {
        self.push(fragment);
    }
}

/// Records draws for a single surface
#[derive(Debug)]
pub struct Device {
    surface: SurfaceConfig,
    tracker: StateStack,
    commands: Vec<KeyedCommand>,
    depth: DepthBuffer,
    last_depth: u32,
    stats: Option<FinalizeStats>,
}

impl Default for Device {
    /// Device over the default 256x256 surface
    fn default() -> Self {
        Self::with_valid_surface(SurfaceConfig::default())
    }
}

impl Device {
    pub fn new(surface: SurfaceConfig) -> Result<Self> {
        surface.validate()?;
        Ok(Self::with_valid_surface(surface))
    }

    fn with_valid_surface(surface: SurfaceConfig) -> Self {
        Self {
            surface,
            tracker: StateStack::new(),
            commands: Vec::new(),
            depth: DepthBuffer::new(surface.width, surface.height),
            last_depth: 0,
            stats: None,
        }
    }

    pub fn surface(&self) -> SurfaceConfig {
        self.surface
    }

    pub fn is_finalized(&self) -> bool {
        self.stats.is_some()
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Depth of the save stack, including the base frame
    pub fn save_count(&self) -> usize {
        self.tracker.depth()
    }

    fn ensure_recording(&self) -> Result<()> {
        if self.is_finalized() {
            Err(RecordError::Finalized)
        } else {
            Ok(())
        }
    }

    fn ensure_finalized(&self) -> Result<()> {
        if self.is_finalized() {
            Ok(())
        } else {
            Err(RecordError::NotFinalized)
        }
    }

    pub fn save(&mut self) -> Result<()> {
        self.ensure_recording()?;
        self.tracker.push();
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.ensure_recording()?;
        self.tracker.pop()
    }

    /// Clip to `rect`, given in the current local space
    pub fn clip_rect(&mut self, rect: IRect) -> Result<()> {
        self.ensure_recording()?;
        self.tracker.clip_rect(rect);
        Ok(())
    }

    pub fn translate(&mut self, delta: IPoint) -> Result<()> {
        self.ensure_recording()?;
        self.tracker.translate(delta);
        Ok(())
    }

    /// Record a rectangle draw at submission depth `depth`
    ///
    /// Depths must strictly increase from one call to the next.
    pub fn draw_rect(
        &mut self,
        id: DrawId,
        depth: u32,
        shape: IRect,
        material: Material,
    ) -> Result<()> {
        self.ensure_recording()?;
        if depth <= self.last_depth {
            return Err(RecordError::DepthOutOfOrder {
                previous: self.last_depth,
                next: depth,
            });
        }
        self.last_depth = depth;

        let state = self.tracker.snapshot();
        let key = OrderKey::new(
            material.is_transparent(),
            material.material_id(),
            depth,
            state.id(),
        );
        tracing::trace!(id, depth, state = state.id().get(), ?material, "draw_rect");

        self.commands.push(KeyedCommand {
            key,
            cmd: DrawCommand::new(id, depth, shape, material, state),
        });
        Ok(())
    }

    /// Current clip/transform state
    pub fn snap_state(&mut self) -> Arc<StateSnapshot> {
        self.tracker.snapshot()
    }

    /// Freeze the recording, sort it and resolve the depth buffer
    ///
    /// Calling this again is a no-op.
    pub fn finalize(&mut self) -> Result<()> {
        if self.is_finalized() {
            tracing::debug!("device already finalized");
            return Ok(());
        }

        // The key is a strict total order, stability is irrelevant.
        self.commands.sort_unstable_by_key(|c| c.key);

        let stats = self.resolve_depth();
        tracing::debug!(
            commands = stats.commands,
            material_switches = stats.material_switches,
            state_switches = stats.state_switches,
            frames_popped = stats.frames_popped,
            frames_pushed = stats.frames_pushed,
            distinct_states = stats.distinct_states,
            fragments_passed = stats.fragments_passed,
            fragments_rejected = stats.fragments_rejected,
            "device finalized"
        );
        self.stats = Some(stats);
        Ok(())
    }

    /// Statistics of the last finalize, `None` while recording
    pub fn stats(&self) -> Option<&FinalizeStats> {
        self.stats.as_ref()
    }

    /// Draw ids in replay order
    ///
    /// Fails with [`RecordError::NotFinalized`] while still recording; the
    /// submission order is never reported as if it were a replay order.
    pub fn get_order(&self) -> Result<Vec<DrawId>> {
        self.ensure_finalized()?;
        Ok(self.commands.iter().map(|c| c.cmd.id()).collect())
    }

    /// Commands in their current order (replay order once finalized)
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().map(|c| &c.cmd)
    }

    /// Resolved depth at a device pixel, `None` off the surface
    pub fn depth_at(&self, x: i32, y: i32) -> Option<u32> {
        self.depth.get(IPoint::new(x, y))
    }

    /// Emit every visible fragment, in replay order
    pub fn replay<S: FragmentSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        self.ensure_finalized()?;

        let mut prev: Option<&StateSnapshot> = None;
        for KeyedCommand { cmd, .. } in &self.commands {
            let state: &StateSnapshot = cmd.state();
            if prev.map_or(true, |p| p.id() != state.id()) {
                let transition = StateTransition::between(prev, state);
                if !transition.is_noop() {
                    sink.state(transition);
                }
                prev = Some(state);
            }

            let Some(area) = coverage(self.surface.bounds(), cmd) else {
                continue;
            };
            let transparent = cmd.is_transparent();
            for point in pixels(area) {
                if !cmd.state().contains_point(point) {
                    continue;
                }
                let Some(resolved) = self.depth.get(point) else {
                    continue;
                };
                let visible = if transparent {
                    cmd.depth() > resolved
                } else {
                    cmd.depth() == resolved
                };
                if visible {
                    sink.fragment(Fragment {
                        id: cmd.id(),
                        x: point.x,
                        y: point.y,
                        color: cmd.material().eval_color(point.x, point.y),
                        blend: transparent,
                    });
                }
            }
        }
        Ok(())
    }

    /// Run the depth test over all commands in replay order
    ///
    /// Opaque fragments write depth, transparent ones only test it.
    fn resolve_depth(&mut self) -> FinalizeStats {
        let mut stats = FinalizeStats {
            commands: self.commands.len(),
            ..Default::default()
        };
        let mut states = FxHashSet::default();
        let mut prev: Option<&KeyedCommand> = None;

        for keyed in &self.commands {
            let KeyedCommand { key, cmd } = keyed;
            if let Some(prev) = prev {
                if prev.key.material() != key.material() {
                    stats.material_switches += 1;
                }
            }
            if prev.map_or(true, |p| p.key.state() != key.state()) {
                let transition =
                    StateTransition::between(prev.map(|p| p.cmd.state().as_ref()), cmd.state());
                if prev.is_some() && !transition.is_noop() {
                    stats.state_switches += 1;
                }
                stats.frames_popped += transition.pop;
                stats.frames_pushed += transition.push.len();
            }
            prev = Some(keyed);
            states.insert(key.state());

            let Some(area) = coverage(self.surface.bounds(), cmd) else {
                continue;
            };
            for point in pixels(area) {
                if !cmd.state().contains_point(point) {
                    continue;
                }
                let passed = if key.is_transparent() {
                    self.depth.test(point, key.depth())
                } else {
                    self.depth.test_and_write(point, key.depth())
                };
                if passed {
                    stats.fragments_passed += 1;
                } else {
                    stats.fragments_rejected += 1;
                }
            }
        }

        stats.distinct_states = states.len();
        stats
    }
}

/// Device-space area a command may touch: shape, surface and clips
fn coverage(surface: IRect, cmd: &DrawCommand) -> Option<IRect> {
    let area = cmd.device_shape().intersect(&surface)?;
    cmd.state().clip_bounds(area)
}

/// Row-major pixel iterator over a rect
fn pixels(area: IRect) -> impl Iterator<Item = IPoint> {
    (area.top()..area.bottom())
        .flat_map(move |y| (area.left()..area.right()).map(move |x| IPoint::new(x, y)))
}
