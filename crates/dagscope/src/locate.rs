//! Reverse index from scene coordinates to DAG nodes.
//!
//! Rendering front ends report picks either with the node id carried by the
//! marker ([`NodeLocator::resolve`]) or with bare coordinates
//! ([`NodeLocator::locate`]). Ids are preferred; coordinates are matched
//! exactly first and then, if a tolerance is configured, by the nearest node
//! within that tolerance.
//!
//! Two nodes sharing one position are not prevented by the data model. The
//! exact match then returns the first of them in layout order. Callers that
//! need a reliable answer should resolve by id.

use dagscope_core::{geometry::Point, identifier::Id};

use crate::layout::PositionIndex;

/// Point-to-node lookup for one execution epoch.
#[derive(Debug, Clone, Default)]
pub struct NodeLocator {
    entries: Vec<(Id, Point)>,
    tolerance: f32,
}

impl NodeLocator {
    /// Builds a locator over `positions` that only matches exact coordinates.
    pub fn new(positions: &PositionIndex) -> Self {
        Self {
            entries: positions.iter().collect(),
            tolerance: 0.0,
        }
    }

    /// Allows coordinate picks up to `tolerance` away from a node (builder style).
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Returns the node at `point`, or `None` if no node is there.
    pub fn locate(&self, point: Point) -> Option<Id> {
        if let Some((id, _)) = self.entries.iter().find(|(_, position)| *position == point) {
            return Some(*id);
        }
        if self.tolerance <= 0.0 {
            return None;
        }

        // min_by keeps the first of equally distant nodes
        self.entries
            .iter()
            .map(|(id, position)| (*id, position.distance(point)))
            .filter(|(_, distance)| *distance <= self.tolerance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }

    /// Returns `id` if it names a node of this epoch.
    pub fn resolve(&self, id: Id) -> Option<Id> {
        self.entries
            .iter()
            .any(|(known, _)| *known == id)
            .then_some(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_locate_roundtrip(points: Vec<(i16, i16)>) -> Result<(), TestCaseError> {
        let mut unique = points;
        unique.sort_unstable();
        unique.dedup();

        let mut positions = PositionIndex::new();
        for (n, (x, y)) in unique.iter().enumerate() {
            positions.insert(Id::from_index(n), Point::new(f32::from(*x), f32::from(*y)), 0);
        }
        let locator = NodeLocator::new(&positions);

        for (id, point) in positions.iter() {
            prop_assert_eq!(locator.locate(point), Some(id));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn locate_roundtrip(points in prop::collection::vec((any::<i16>(), any::<i16>()), 0..40)) {
            check_locate_roundtrip(points)?;
        }
    }
}
