use itertools::Itertools;

use crate::collision_detection::scaled::{IPoint, IRect};

/// Lattice of candidate positions radiating out from the centre of the work area.
///
/// Offsets are sorted once by squared distance to the centre, ties broken by `dy` and then `dx`,
/// so every probing pass visits candidates in the same total order.
#[derive(Clone, Debug)]
pub struct ProbeLattice {
    pub center: IPoint,
    pub step: i64,
    offsets: Vec<(i64, i64)>,
}

impl ProbeLattice {
    /// Lattice covering `bbox` with `resolution` steps across its larger dimension.
    pub fn new(bbox: IRect, resolution: usize) -> Self {
        let center = IPoint(
            bbox.x_min + bbox.width() / 2,
            bbox.y_min + bbox.height() / 2,
        );
        let step = i64::max(1, i64::max(bbox.width(), bbox.height()) / resolution as i64);

        //half extents and step are non-negative, round up so the lattice covers the whole bbox
        let nx = (bbox.width() / 2 + step - 1) / step;
        let ny = (bbox.height() / 2 + step - 1) / step;

        let offsets = (-ny..=ny)
            .cartesian_product(-nx..=nx)
            .map(|(j, i)| (i * step, j * step))
            .sorted_by_key(|&(dx, dy)| probe_key(dx, dy))
            .collect_vec();

        ProbeLattice {
            center,
            step,
            offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// All lattice positions, closest to the centre first.
    pub fn probes(&self) -> impl Iterator<Item = IPoint> + '_ {
        self.offsets
            .iter()
            .map(|&(dx, dy)| IPoint(self.center.0 + dx, self.center.1 + dy))
    }

    /// Positions of a finer lattice, `refine_steps` subdivisions per step, within one step of `around`.
    pub fn refinement(&self, around: IPoint, refine_steps: usize) -> impl Iterator<Item = IPoint> {
        let n = refine_steps as i64;
        let sub_step = i64::max(1, self.step / i64::max(1, n));
        (-n..=n)
            .cartesian_product(-n..=n)
            .map(move |(j, i)| IPoint(around.0 + i * sub_step, around.1 + j * sub_step))
    }

    /// Sort key of a position: closer to the centre is better.
    pub fn key(&self, p: IPoint) -> (i128, i64, i64) {
        probe_key(p.0 - self.center.0, p.1 - self.center.1)
    }
}

fn probe_key(dx: i64, dy: i64) -> (i128, i64, i64) {
    let sq_d = dx as i128 * dx as i128 + dy as i128 * dy as i128;
    (sq_d, dy, dx)
}
