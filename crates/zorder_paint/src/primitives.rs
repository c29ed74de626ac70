//! Integer geometric primitives

use std::ops::{Add, AddAssign, Neg};

/// A point (or offset) in integer pixel space
///
/// Arithmetic saturates at the `i32` range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const ZERO: IPoint = IPoint { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IPoint {
    type Output = IPoint;

    fn add(self, rhs: IPoint) -> IPoint {
        IPoint::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for IPoint {
    fn add_assign(&mut self, rhs: IPoint) {
        *self = *self + rhs;
    }
}

impl Neg for IPoint {
    type Output = IPoint;

    fn neg(self) -> IPoint {
        IPoint::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

/// An axis-aligned integer rectangle
///
/// Covers the half-open pixel range `[x, x + width) x [y, y + height)`.
/// Rectangles with a non-positive width or height are empty. Edge and offset
/// math saturates at the `i32` range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from left/top/right/bottom edges
    pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: IPoint) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Offset the rect by a delta
    pub fn offset(&self, delta: IPoint) -> Self {
        Self::new(
            self.x.saturating_add(delta.x),
            self.y.saturating_add(delta.y),
            self.width,
            self.height,
        )
    }

    /// Intersection of two rects, `None` when they do not overlap
    pub fn intersect(&self, other: &IRect) -> Option<IRect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let rect = IRect::from_ltrb(left, top, right, bottom);
        (!rect.is_empty()).then_some(rect)
    }
}
