use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use thousands::Separable;

use crate::ArrangeError;
use crate::arrange::{ArrangeConfig, ProbeLattice, UnplacedPolicy};
use crate::collision_detection::scaled::{IPoint, ScaledBoundary, ScaledPolygon};
use crate::collision_detection::{CDEngine, Hazard, HazardEntity};
use crate::entities::{Arrangement, Footprint, ItemPlacement, WorkArea};
use crate::geometry::DTransformation;
use crate::geometry::primitives::Point;
use crate::geometry::shape_modification::inflate_convex;

/// Finds positions for the `new` footprints inside `work_area`, clear of each other and of the `fixed` ones.
///
/// Footprints are handled in order of descending area. Each one is placed at the valid lattice position
/// closest to the centre of the work area, considering every allowed rotation.
/// Footprints for which no valid position exists are reported as unplaced, they never abort the arrangement.
pub fn arrange(
    new: &[Footprint],
    fixed: &[Footprint],
    work_area: &WorkArea,
    config: &ArrangeConfig,
) -> Result<Arrangement, ArrangeError> {
    config.validate()?;
    work_area.validate()?;

    let start = Instant::now();
    let mut engine = ArrangeEngine::new(fixed, work_area, config)?;

    let sorted_indices = (0..new.len())
        .sorted_by_key(|&i| (Reverse(OrderedFloat(new[i].area())), i))
        .collect_vec();

    let mut placements = vec![ItemPlacement::Unplaced(None); new.len()];
    let mut unplaced = vec![];
    for idx in sorted_indices {
        let footprint = &new[idx];
        let capacity_reached = work_area
            .capacity
            .is_some_and(|cap| engine.n_placed >= cap);

        let placement = match capacity_reached {
            true => {
                debug!("[ARR] capacity reached, footprint {idx} not probed");
                None
            }
            false => engine.place(idx, footprint),
        };

        match placement {
            Some(dt) => {
                info!(
                    "[ARR] placed footprint {}/{} at [{}]",
                    idx + 1,
                    new.len(),
                    dt
                );
                placements[idx] = ItemPlacement::Placed(dt);
            }
            None => {
                info!("[ARR] no valid position for footprint {}/{}", idx + 1, new.len());
                unplaced.push(idx);
            }
        }
    }

    if config.unplaced_policy == UnplacedPolicy::KeepAtFallback {
        let mut row = FallbackRow::new(work_area, config.min_offset);
        for &idx in &unplaced {
            placements[idx] = ItemPlacement::Unplaced(Some(row.next(&new[idx])));
        }
    }

    info!(
        "[ARR] arrangement finished in {:.3}ms, {}/{} placed ({} probes)",
        start.elapsed().as_secs_f64() * 1000.0,
        new.len() - unplaced.len(),
        new.len(),
        engine.n_probes.separate_with_commas()
    );

    Ok(Arrangement {
        placements,
        n_unplaced: unplaced.len(),
        n_probes: engine.n_probes,
    })
}

struct ArrangeEngine<'a> {
    config: &'a ArrangeConfig,
    cde: CDEngine,
    lattice: ProbeLattice,
    inflation: f64,
    n_placed: usize,
    n_probes: usize,
}

/// Best position found for a footprint in a specific orientation
struct Candidate {
    pos: IPoint,
    rotation: f64,
}

impl<'a> ArrangeEngine<'a> {
    fn new(
        fixed: &[Footprint],
        work_area: &WorkArea,
        config: &'a ArrangeConfig,
    ) -> Result<Self, ArrangeError> {
        let boundary = ScaledBoundary::new(&work_area.shape, config.scale_factor)
            .map_err(|e| ArrangeError::InvalidWorkArea(e.to_string()))?;
        let lattice = ProbeLattice::new(boundary.bbox, config.probe_resolution);

        //half the clearance per footprint, plus one scaled unit to absorb rounding
        let inflation = config.min_offset / 2.0 + 1.0 / config.scale_factor;

        let mut cde = CDEngine::new(boundary);
        for (idx, fp) in fixed.iter().enumerate() {
            let inflated = inflate_convex(&fp.shape.vertices, inflation, config.circle_segments);
            match ScaledPolygon::from_points(&inflated, config.scale_factor) {
                Ok(shape) => {
                    cde.register_hazard(Hazard::new(
                        HazardEntity::FixedObstacle { idx },
                        Arc::new(shape),
                    ));
                }
                Err(e) => warn!("[ARR] fixed obstacle {idx} ignored: {e}"),
            }
        }
        debug!(
            "[ARR] {} fixed hazards registered, probing lattice of {} points (step: {})",
            cde.n_hazards(),
            lattice.len().separate_with_commas(),
            lattice.step
        );

        Ok(ArrangeEngine {
            config,
            cde,
            lattice,
            inflation,
            n_placed: 0,
            n_probes: 0,
        })
    }

    /// Searches a position for the footprint and registers it as a hazard when one is found.
    fn place(&mut self, idx: usize, footprint: &Footprint) -> Option<DTransformation> {
        let config = self.config;
        let mut best: Option<(Candidate, ScaledPolygon)> = None;

        for &rotation_deg in &config.rotations {
            let rotation = rotation_deg.to_radians();
            let local = footprint.local_points(rotation);
            let shapes = (
                ScaledPolygon::from_points(&local, config.scale_factor),
                ScaledPolygon::from_points(
                    &inflate_convex(&local, self.inflation, config.circle_segments),
                    config.scale_factor,
                ),
            );
            let (raw, inflated) = match shapes {
                (Ok(raw), Ok(inflated)) => (raw, inflated),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("[ARR] footprint {idx} cannot be represented at {rotation_deg}°: {e}");
                    continue;
                }
            };

            if let Some(pos) = self.search(&raw, &inflated) {
                let improves = match &best {
                    None => true,
                    Some((c, _)) => self.lattice.key(pos).0 < self.lattice.key(c.pos).0,
                };
                if improves {
                    best = Some((Candidate { pos, rotation }, inflated));
                }
            }
        }

        let (candidate, inflated) = best?;
        let offset = (candidate.pos.0, candidate.pos.1);
        let mut hazard_shape = inflated.clone();
        hazard_shape.translate_from(&inflated, offset);
        self.cde.register_hazard(Hazard::new(
            HazardEntity::PlacedFootprint { idx },
            Arc::new(hazard_shape),
        ));
        self.n_placed += 1;

        let target = candidate.pos.to_point(config.scale_factor);
        Some(footprint.placement_transform(candidate.rotation, target))
    }

    /// First valid lattice position, refined on a finer lattice around it.
    fn search(&mut self, raw: &ScaledPolygon, inflated: &ScaledPolygon) -> Option<IPoint> {
        let mut buffers = (raw.clone(), inflated.clone());

        let first = self
            .lattice
            .probes()
            .find(|p| {
                self.n_probes += 1;
                is_valid(&self.cde, raw, inflated, *p, &mut buffers)
            })?;

        let refined = self
            .lattice
            .refinement(first, self.config.refine_steps)
            .filter(|p| self.lattice.key(*p) < self.lattice.key(first))
            .sorted_by_key(|p| self.lattice.key(*p))
            .find(|p| {
                self.n_probes += 1;
                is_valid(&self.cde, raw, inflated, *p, &mut buffers)
            });

        Some(refined.unwrap_or(first))
    }
}

/// A position is valid if the footprint lies inside the work area and its inflated shape clears all hazards.
fn is_valid(
    cde: &CDEngine,
    raw: &ScaledPolygon,
    inflated: &ScaledPolygon,
    pos: IPoint,
    (raw_buffer, inflated_buffer): &mut (ScaledPolygon, ScaledPolygon),
) -> bool {
    let offset = (pos.0, pos.1);
    //cheap bounding box test before any shape is moved
    if !cde.boundary().bbox.contains(&raw.bbox.translated(offset)) {
        return false;
    }
    raw_buffer.translate_from(raw, offset);
    inflated_buffer.translate_from(inflated, offset);
    cde.detect_collision(raw_buffer, inflated_buffer).is_none()
}

/// Row of unplaced footprints to the right of the work area, stacked downwards.
struct FallbackRow {
    x_min: f64,
    cursor_y: f64,
    spacing: f64,
}

impl FallbackRow {
    fn new(work_area: &WorkArea, spacing: f64) -> Self {
        let bbox = work_area.bbox();
        FallbackRow {
            x_min: bbox.x_max + spacing,
            cursor_y: bbox.y_max,
            spacing,
        }
    }

    fn next(&mut self, footprint: &Footprint) -> DTransformation {
        let bbox = footprint.shape.bbox;
        let target = Point(
            self.x_min + bbox.width() / 2.0,
            self.cursor_y - bbox.height() / 2.0,
        );
        self.cursor_y -= bbox.height() + self.spacing;
        footprint.placement_transform(0.0, target)
    }
}
