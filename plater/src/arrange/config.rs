use serde::{Deserialize, Serialize};

use crate::ArrangeError;

/// Upper bound on [`ArrangeConfig::probe_resolution`].
/// The lattice holds `(2 * resolution + 1)^2` offsets, all generated before probing starts.
pub const MAX_PROBE_RESOLUTION: usize = 1000;

/// Configuration of the arrangement engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeConfig {
    /// Minimum clearance between two footprints, in model units
    pub min_offset: f64,
    /// Multiplier converting real coordinates to the scaled integer space
    pub scale_factor: f64,
    /// Number of lattice steps across the larger dimension of the work area, at most [`MAX_PROBE_RESOLUTION`]
    pub probe_resolution: usize,
    /// Number of subdivisions of one lattice step used to refine the first valid probe
    pub refine_steps: usize,
    /// Allowed rotations in degrees, tried in order
    pub rotations: Vec<f64>,
    /// Number of segments of the polygon approximating the clearance disc
    pub circle_segments: usize,
    /// What happens to footprints for which no position is found
    pub unplaced_policy: UnplacedPolicy,
}

/// Treatment of footprints which could not be placed inside the work area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnplacedPolicy {
    /// Give them a transformation to a row next to the work area
    KeepAtFallback,
    /// Leave them without transformation
    Omit,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            min_offset: 8.0,
            scale_factor: 10_000.0,
            probe_resolution: 200,
            refine_steps: 4,
            rotations: vec![0.0],
            circle_segments: 16,
            unplaced_policy: UnplacedPolicy::KeepAtFallback,
        }
    }
}

impl ArrangeConfig {
    pub fn with_min_offset(mut self, min_offset: f64) -> Self {
        self.min_offset = min_offset;
        self
    }

    pub fn validate(&self) -> Result<(), ArrangeError> {
        let invalid = |msg: String| Err(ArrangeError::InvalidConfig(msg));

        if !(self.min_offset > 0.0 && self.min_offset.is_finite()) {
            return invalid(format!("min_offset must be positive, got {}", self.min_offset));
        }
        if !(self.scale_factor > 0.0 && self.scale_factor.is_finite()) {
            return invalid(format!(
                "scale_factor must be positive, got {}",
                self.scale_factor
            ));
        }
        if self.min_offset * self.scale_factor < 1.0 {
            return invalid(format!(
                "min_offset {} is below the resolution of scale_factor {}",
                self.min_offset, self.scale_factor
            ));
        }
        if !(1..=MAX_PROBE_RESOLUTION).contains(&self.probe_resolution) {
            return invalid(format!(
                "probe_resolution must be between 1 and {MAX_PROBE_RESOLUTION}, got {}",
                self.probe_resolution
            ));
        }
        if self.rotations.is_empty() || self.rotations.iter().any(|r| !r.is_finite()) {
            return invalid(format!(
                "rotations must be a non-empty list of finite angles, got {:?}",
                self.rotations
            ));
        }
        if self.circle_segments < 3 {
            return invalid(format!(
                "circle_segments must be at least 3, got {}",
                self.circle_segments
            ));
        }
        Ok(())
    }
}
