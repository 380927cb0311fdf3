use crate::geometry::DTransformation;

/// Outcome for a single new footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemPlacement {
    /// A valid position was found
    Placed(DTransformation),
    /// No valid position was found, optionally with a transformation moving it next to the work area
    Unplaced(Option<DTransformation>),
}

impl ItemPlacement {
    pub fn is_placed(&self) -> bool {
        matches!(self, ItemPlacement::Placed(_))
    }

    /// The transformation to apply to the footprint's object, if any.
    pub fn transform(&self) -> Option<DTransformation> {
        match self {
            ItemPlacement::Placed(dt) => Some(*dt),
            ItemPlacement::Unplaced(fallback) => *fallback,
        }
    }
}

/// Result of an arrangement.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement {
    /// One entry per new footprint, in the same order as the input
    pub placements: Vec<ItemPlacement>,
    /// Number of footprints for which no valid position was found
    pub n_unplaced: usize,
    /// Number of candidate positions evaluated
    pub n_probes: usize,
}

impl Arrangement {
    pub fn n_placed(&self) -> usize {
        self.placements.len() - self.n_unplaced
    }
}
