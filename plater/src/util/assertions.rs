//! Expensive consistency checks, only evaluated in debug builds or with the `extra-assertions` feature.

use itertools::Itertools;

use crate::collision_detection::{CDEngine, HazardEntity};

/// Checks that no two hazards of placed footprints overlap.
/// Fixed obstacles are exempt, objects already on the plate may overlap each other.
pub fn placed_hazards_disjoint(cde: &CDEngine) -> bool {
    cde.hazards()
        .filter(|h| matches!(h.entity, HazardEntity::PlacedFootprint { .. }))
        .collect_vec()
        .into_iter()
        .tuple_combinations()
        .all(|(h1, h2)| !h1.shape.collides_with(&h2.shape))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collision_detection::Hazard;
    use crate::collision_detection::scaled::{ScaledBoundary, ScaledPolygon};
    use crate::geometry::primitives::{Point, Rect, SPolygon};

    fn engine() -> CDEngine {
        let plate = SPolygon::from(Rect::from_center(Point(0.0, 0.0), 100.0, 100.0).unwrap());
        CDEngine::new(ScaledBoundary::new(&plate, 100.0).unwrap())
    }

    fn square(entity: HazardEntity, x: f64) -> Hazard {
        let r = Rect::from_center(Point(x, 0.0), 10.0, 10.0).unwrap();
        let shape = ScaledPolygon::from_points(&r.corners(), 100.0).unwrap();
        Hazard::new(entity, Arc::new(shape))
    }

    #[test]
    fn fixed_obstacles_may_overlap() {
        let mut cde = engine();
        cde.register_hazard(square(HazardEntity::PlacedFootprint { idx: 0 }, -20.0));
        cde.register_hazard(square(HazardEntity::PlacedFootprint { idx: 1 }, 20.0));
        cde.register_hazard(square(HazardEntity::FixedObstacle { idx: 0 }, 15.0));
        cde.register_hazard(square(HazardEntity::FixedObstacle { idx: 1 }, 18.0));
        assert!(placed_hazards_disjoint(&cde));
    }

    #[test]
    #[should_panic]
    fn overlapping_placements_are_caught() {
        let mut cde = engine();
        cde.register_hazard(square(HazardEntity::PlacedFootprint { idx: 0 }, 0.0));
        cde.register_hazard(square(HazardEntity::PlacedFootprint { idx: 1 }, 5.0));
    }
}
