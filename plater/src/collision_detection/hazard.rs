use std::sync::Arc;

use crate::collision_detection::scaled::ScaledPolygon;

/// Any spatial constraint a footprint has to respect during arrangement.
#[derive(Clone, Debug)]
pub struct Hazard {
    /// The entity inducing the hazard
    pub entity: HazardEntity,
    /// The (inflated) shape of the hazard, in scaled space
    pub shape: Arc<ScaledPolygon>,
}

impl Hazard {
    pub fn new(entity: HazardEntity, shape: Arc<ScaledPolygon>) -> Self {
        Self { entity, shape }
    }
}

/// Entities that induce hazards for the arrangement engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HazardEntity {
    /// Footprint of an object already on the build plate, indexed in the fixed input
    FixedObstacle { idx: usize },
    /// Footprint placed during the current arrangement, indexed in the new input
    PlacedFootprint { idx: usize },
    /// Everything outside the work area
    Exterior,
}
