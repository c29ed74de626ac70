//! Per-pixel depth buffer
//!
//! Depth 0 means nothing has been drawn; every recorded draw has a depth of
//! at least 1, so it passes against a cleared pixel.

use zorder_paint::IPoint;

/// Row-major depth values for one surface
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    depths: Vec<u32>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depths: vec![0; width as usize * height as usize],
        }
    }

    fn index(&self, point: IPoint) -> Option<usize> {
        let x = u32::try_from(point.x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(point.y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Stored depth, `None` off the surface
    pub fn get(&self, point: IPoint) -> Option<u32> {
        self.index(point).map(|i| self.depths[i])
    }

    /// `depth` is in front of what is stored at `point`
    pub fn test(&self, point: IPoint, depth: u32) -> bool {
        self.get(point).is_some_and(|stored| depth > stored)
    }

    /// Depth test, writing `depth` on success
    pub fn test_and_write(&mut self, point: IPoint, depth: u32) -> bool {
        let Some(i) = self.index(point) else {
            return false;
        };
        if depth > self.depths[i] {
            self.depths[i] = depth;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        let buffer = DepthBuffer::new(4, 4);
        assert_eq!(buffer.get(IPoint::new(3, 3)), Some(0));
        assert!(buffer.test(IPoint::new(0, 0), 1));
    }

    #[test]
    fn test_off_surface_points_never_pass() {
        let mut buffer = DepthBuffer::new(4, 4);
        assert_eq!(buffer.get(IPoint::new(4, 0)), None);
        assert_eq!(buffer.get(IPoint::new(0, -1)), None);
        assert!(!buffer.test_and_write(IPoint::new(-1, 2), 10));
    }

    #[test]
    fn test_write_keeps_frontmost() {
        let mut buffer = DepthBuffer::new(2, 2);
        let p = IPoint::new(1, 1);
        assert!(buffer.test_and_write(p, 5));
        assert!(!buffer.test_and_write(p, 3));
        assert!(!buffer.test_and_write(p, 5));
        assert!(buffer.test_and_write(p, 6));
        assert_eq!(buffer.get(p), Some(6));
    }
}
