//! Clip/transform state tracking
//!
//! [`StateStack`] is the mutable save/clip/translate stack a device records
//! against. Every draw captures a [`StateSnapshot`] of it: an immutable,
//! `Arc`-shared copy with all clip rectangles resolved into device space.
//!
//! Snapshots are memoized on the top frame, so repeated draws between
//! mutations share one instance and compare by [`SnapshotId`] alone.
//!
//! ```
//! use zorder_core::state::StateStack;
//! use zorder_paint::{IPoint, IRect};
//!
//! let mut stack = StateStack::new();
//! stack.translate(IPoint::new(10, 0));
//! stack.clip_rect(IRect::new(0, 0, 20, 20));
//!
//! let snap = stack.snapshot();
//! assert!(snap.contains_point(IPoint::new(15, 5)));
//! assert!(!snap.contains_point(IPoint::new(5, 5)));
//! ```

use std::sync::Arc;

use smallvec::SmallVec;
use zorder_paint::{IPoint, IRect};

use crate::canvas::Canvas;
use crate::error::{RecordError, Result};

/// Clip rectangles held by a single frame
pub type ClipRects = SmallVec<[IRect; 2]>;

/// Identity of a [`StateSnapshot`], unique within the stack that produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(u32);

impl SnapshotId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Monotonic id source owned by a [`StateStack`]
#[derive(Debug)]
struct SnapshotIdAllocator {
    next: u32,
}

impl SnapshotIdAllocator {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn next(&mut self) -> SnapshotId {
        let id = SnapshotId(self.next);
        self.next += 1;
        id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frames
// ─────────────────────────────────────────────────────────────────────────────

/// One save scope of the stack
#[derive(Clone, Debug, Default)]
pub struct StateFrame {
    /// Translation accumulated within this frame only
    translation: IPoint,
    /// Clips in the space of the frame beneath, offset by `translation` as it
    /// was when each clip was added
    clip_rects: ClipRects,
    /// Snapshot taken while this frame was on top, cleared on mutation
    cached: Option<Arc<StateSnapshot>>,
}

impl StateFrame {
    pub fn translation(&self) -> IPoint {
        self.translation
    }

    pub fn clip_rects(&self) -> &[IRect] {
        &self.clip_rects
    }

    /// Whether a snapshot is currently memoized on this frame
    pub fn has_cached_snapshot(&self) -> bool {
        self.cached.is_some()
    }

    fn add_clip(&mut self, rect: IRect) {
        self.clip_rects.push(rect.offset(self.translation));
        self.cached = None;
    }

    fn translate(&mut self, delta: IPoint) {
        self.translation += delta;
        self.cached = None;
    }
}

/// A frame as captured by a snapshot, clips already in device space
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFrame {
    /// Cumulative translation of the frames below this one
    origin: IPoint,
    translation: IPoint,
    clip_rects: ClipRects,
}

impl ResolvedFrame {
    pub fn origin(&self) -> IPoint {
        self.origin
    }

    pub fn translation(&self) -> IPoint {
        self.translation
    }

    pub fn clip_rects(&self) -> &[IRect] {
        &self.clip_rects
    }

    /// Point lies outside at least one clip of this frame
    pub fn is_clipped(&self, point: IPoint) -> bool {
        self.clip_rects.iter().any(|r| !r.contains(point))
    }

    /// Re-create this frame on top of `canvas`: save, clip, then translate
    ///
    /// The canvas must already hold the frames below this one, so its
    /// current translation equals [`origin`](Self::origin).
    pub fn apply(&self, canvas: &mut Canvas) -> Result<()> {
        canvas.save()?;
        for rect in &self.clip_rects {
            canvas.clip_rect(rect.offset(-self.origin))?;
        }
        canvas.translate(self.translation.x, self.translation.y)
    }
}

/// Frames a consumer must unwind and re-apply to move between two snapshots
///
/// Built from [`StateSnapshot::determine_shared_prefix`]: everything past the
/// shared prefix of the previous snapshot is popped, everything past it in the
/// next snapshot is pushed.
#[derive(Clone, Copy, Debug)]
pub struct StateTransition<'a> {
    /// Frames of the previous snapshot to restore away
    pub pop: usize,
    /// Frames of the next snapshot to apply, outermost first
    pub push: &'a [ResolvedFrame],
}

impl<'a> StateTransition<'a> {
    /// Transition from `prev` (`None` for a consumer in its initial state)
    pub fn between(prev: Option<&StateSnapshot>, next: &'a StateSnapshot) -> Self {
        let shared = next.determine_shared_prefix(prev);
        Self {
            pop: prev.map_or(0, |p| p.len() - shared),
            push: &next.frames[shared..],
        }
    }

    /// Nothing to unwind or apply
    pub fn is_noop(&self) -> bool {
        self.pop == 0 && self.push.is_empty()
    }

    /// Replay the transition onto `canvas`
    pub fn apply(&self, canvas: &mut Canvas) -> Result<()> {
        for _ in 0..self.pop {
            canvas.restore()?;
        }
        self.push.iter().try_for_each(|frame| frame.apply(canvas))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshots
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable capture of a [`StateStack`] at one instant
///
/// Equality compares the frame sequences only; two snapshots with different
/// ids but identical frames are equal.
#[derive(Debug)]
pub struct StateSnapshot {
    id: SnapshotId,
    ctm: IPoint,
    frames: Vec<ResolvedFrame>,
}

impl PartialEq for StateSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.frames == other.frames
    }
}

impl Eq for StateSnapshot {}

impl StateSnapshot {
    fn new(id: SnapshotId, stack: &[StateFrame]) -> Self {
        let mut ctm = IPoint::ZERO;
        let mut frames = Vec::with_capacity(stack.len());
        for frame in stack {
            // Clips are offset by the translations strictly below this frame.
            frames.push(ResolvedFrame {
                origin: ctm,
                translation: frame.translation,
                clip_rects: frame.clip_rects.iter().map(|r| r.offset(ctm)).collect(),
            });
            ctm += frame.translation;
        }

        Self { id, ctm, frames }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Cumulative translation of all frames
    pub fn ctm(&self) -> IPoint {
        self.ctm
    }

    pub fn frames(&self) -> &[ResolvedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of leading frames identical between `self` and `other`
    ///
    /// A consumer switching from `other` to `self` only has to unwind and
    /// re-apply the frames past this prefix. `None` shares nothing.
    pub fn determine_shared_prefix(&self, other: Option<&StateSnapshot>) -> usize {
        let Some(other) = other else {
            return 0;
        };

        self.frames
            .iter()
            .zip(&other.frames)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Device-space point is inside every clip of every frame
    pub fn contains_point(&self, point: IPoint) -> bool {
        !self.is_clipped(point)
    }

    pub fn is_clipped(&self, point: IPoint) -> bool {
        self.frames.iter().any(|f| f.is_clipped(point))
    }

    /// Intersection of `bounds` with every clip, `None` if nothing survives
    pub fn clip_bounds(&self, bounds: IRect) -> Option<IRect> {
        self.frames
            .iter()
            .flat_map(|f| f.clip_rects.iter())
            .try_fold(bounds, |acc, r| acc.intersect(r))
            .filter(|r| !r.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stack
// ─────────────────────────────────────────────────────────────────────────────

/// Nested save/clip/translate scopes
///
/// There is always a base frame, created at construction, that can never be
/// popped.
#[derive(Debug)]
pub struct StateStack {
    frames: Vec<StateFrame>,
    ids: SnapshotIdAllocator,
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            frames: vec![StateFrame::default()],
            ids: SnapshotIdAllocator::new(),
        }
    }

    /// Number of frames, including the base frame
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> &StateFrame {
        self.frames
            .last()
            .unwrap_or_else(|| unreachable!("state stack lost its base frame"))
    }

    fn top_mut(&mut self) -> &mut StateFrame {
        self.frames
            .last_mut()
            .unwrap_or_else(|| unreachable!("state stack lost its base frame"))
    }

    /// Open a new scope (save)
    pub fn push(&mut self) {
        self.frames.push(StateFrame::default());
    }

    /// Close the innermost scope (restore)
    pub fn pop(&mut self) -> Result<()> {
        if self.frames.len() <= 1 {
            return Err(RecordError::UnbalancedRestore);
        }
        self.frames.pop();
        Ok(())
    }

    /// Add a clip, expressed in the current local space
    pub fn clip_rect(&mut self, rect: IRect) {
        self.top_mut().add_clip(rect);
    }

    pub fn translate(&mut self, delta: IPoint) {
        self.top_mut().translate(delta);
    }

    /// Capture the current state, reusing the memoized snapshot if unchanged
    pub fn snapshot(&mut self) -> Arc<StateSnapshot> {
        if let Some(cached) = &self.top().cached {
            return Arc::clone(cached);
        }

        let snapshot = Arc::new(StateSnapshot::new(self.ids.next(), &self.frames));
        tracing::trace!(
            id = snapshot.id().get(),
            frames = snapshot.len(),
            "new state snapshot"
        );
        self.top_mut().cached = Some(Arc::clone(&snapshot));
        snapshot
    }
}
