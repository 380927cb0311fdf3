use slotmap::{SlotMap, new_key_type};

use crate::collision_detection::hazard::{Hazard, HazardEntity};
use crate::collision_detection::scaled::{ScaledBoundary, ScaledPolygon};
use crate::util::assertions;

new_key_type! {
    /// Key to identify hazards registered in the [`CDEngine`]
    pub struct HazKey;
}

/// The Collision Detection Engine (CDE).
/// Answers whether a candidate shape fits inside the work area and clears every registered [`Hazard`].
/// All queries are exact, they operate on the scaled integer geometry.
#[derive(Clone, Debug)]
pub struct CDEngine {
    boundary: ScaledBoundary,
    hazards: SlotMap<HazKey, Hazard>,
}

impl CDEngine {
    pub fn new(boundary: ScaledBoundary) -> CDEngine {
        CDEngine {
            boundary,
            hazards: SlotMap::with_key(),
        }
    }

    pub fn register_hazard(&mut self, hazard: Hazard) -> HazKey {
        let hkey = self.hazards.insert(hazard);

        if cfg!(feature = "extra-assertions") {
            assert!(assertions::placed_hazards_disjoint(self));
        } else {
            debug_assert!(assertions::placed_hazards_disjoint(self));
        }
        hkey
    }

    pub fn hazards(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.values()
    }

    pub fn n_hazards(&self) -> usize {
        self.hazards.len()
    }

    pub fn boundary(&self) -> &ScaledBoundary {
        &self.boundary
    }

    /// Whether `shape` lies (at least partially) outside the work area.
    pub fn boundary_excludes(&self, shape: &ScaledPolygon) -> bool {
        !self.boundary.contains(shape)
    }

    /// Returns the first entity `shape` collides with, if any.
    /// `raw` is tested against the work area, `inflated` against the registered hazards.
    pub fn detect_collision(
        &self,
        raw: &ScaledPolygon,
        inflated: &ScaledPolygon,
    ) -> Option<HazardEntity> {
        if self.boundary_excludes(raw) {
            return Some(HazardEntity::Exterior);
        }
        self.hazards
            .values()
            .find(|h| h.shape.collides_with(inflated))
            .map(|h| h.entity)
    }
}
