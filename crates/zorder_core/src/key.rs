//! Replay order keys
//!
//! The replay order has two jobs that pull in different directions:
//!
//! - opaque draws go front to back (reverse painter's order) so an early
//!   depth test can reject hidden fragments, clustered by material;
//! - transparent draws go back to front (painter's order) so blending is
//!   correct.
//!
//! All opaque draws precede all transparent ones, so the opaque pass has laid
//! down the depth buffer before anything is blended over it.
//!
//! | class       | 1st         | 2nd               | 3rd         |
//! |-------------|-------------|-------------------|-------------|
//! | opaque      | material id | depth, descending | snapshot id |
//! | transparent | depth       | material id       | snapshot id |
//!
//! Depths are unique per device, so the key is a strict total order on the
//! commands of one device and the sort does not need to be stable.

use std::cmp::{Ordering, Reverse};

use zorder_paint::MaterialId;

use crate::state::SnapshotId;

/// Composite sort key of one draw command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    transparent: bool,
    material: MaterialId,
    depth: u32,
    state: SnapshotId,
}

impl OrderKey {
    pub fn new(transparent: bool, material: MaterialId, depth: u32, state: SnapshotId) -> Self {
        Self {
            transparent,
            material,
            depth,
            state,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Submission depth of the keyed command
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn state(&self) -> SnapshotId {
        self.state
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // `false < true`: the opaque class sorts first.
        self.transparent
            .cmp(&other.transparent)
            .then_with(|| {
                if self.transparent {
                    (self.depth, self.material, self.state).cmp(&(
                        other.depth,
                        other.material,
                        other.state,
                    ))
                } else {
                    (self.material, Reverse(self.depth), self.state).cmp(&(
                        other.material,
                        Reverse(other.depth),
                        other.state,
                    ))
                }
            })
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateStack;

    fn state_ids(n: usize) -> Vec<SnapshotId> {
        let mut stack = StateStack::new();
        (0..n)
            .map(|i| {
                stack.translate(zorder_paint::IPoint::new(i as i32 + 1, 0));
                stack.snapshot().id()
            })
            .collect()
    }

    #[test]
    fn test_opaque_before_transparent() {
        let s = state_ids(1)[0];
        let opaque = OrderKey::new(false, MaterialId::RADIAL, 100, s);
        let transparent = OrderKey::new(true, MaterialId::SOLID, 1, s);
        assert!(opaque < transparent);
    }

    #[test]
    fn test_opaque_clusters_by_material_then_front_to_back() {
        let s = state_ids(1)[0];
        let solid_back = OrderKey::new(false, MaterialId::SOLID, 1, s);
        let solid_front = OrderKey::new(false, MaterialId::SOLID, 5, s);
        let linear_back = OrderKey::new(false, MaterialId::LINEAR, 2, s);

        let mut keys = vec![linear_back, solid_back, solid_front];
        keys.sort_unstable();
        assert_eq!(keys, vec![solid_front, solid_back, linear_back]);
    }

    #[test]
    fn test_transparent_is_painters_order_regardless_of_material() {
        let ids = state_ids(2);
        let a = OrderKey::new(true, MaterialId::RADIAL, 1, ids[1]);
        let b = OrderKey::new(true, MaterialId::SOLID, 2, ids[0]);
        let c = OrderKey::new(true, MaterialId::LINEAR, 3, ids[1]);

        let mut keys = vec![c, b, a];
        keys.sort_unstable();
        assert_eq!(keys, vec![a, b, c]);
    }

    #[test]
    fn test_state_breaks_remaining_ties() {
        let ids = state_ids(2);
        let a = OrderKey::new(false, MaterialId::SOLID, 3, ids[0]);
        let b = OrderKey::new(false, MaterialId::SOLID, 3, ids[1]);
        assert!(a < b);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }
}
