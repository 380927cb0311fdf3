use std::sync::Mutex;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, warn};
use plater::arrange::{ArrangeConfig, arrange};
use plater::entities::{Arrangement, Footprint, WorkArea};
use plater::geometry::DTransformation;

use crate::{MultiplyError, SceneError};
use crate::command::{CommandHistory, Operation, ReversibleCommand};
use crate::extract::{extract_footprint, fixed_footprints, project_group_id};
use crate::notify::Notifier;
use crate::scene::{NodeKey, Scene};

/// Duplicates objects of a shared scene and arranges the copies on the build plate.
///
/// All collaborators are injected, the multiplier owns nothing but its configuration.
pub struct Multiplier<'a> {
    pub scene: &'a Mutex<Scene>,
    pub history: &'a Mutex<CommandHistory>,
    pub work_area: WorkArea,
    pub config: ArrangeConfig,
    pub notifier: &'a dyn Notifier,
}

/// Result of a multiply-and-place request.
#[derive(Clone, Debug)]
pub struct MultiplyOutcome {
    /// The applied command, also recorded in the history
    pub command: ReversibleCommand,
    /// Number of copies for which no position was found inside the work area
    pub n_unplaced: usize,
    /// Top nodes of all copies added to the scene
    pub added: Vec<NodeKey>,
}

/// A copy waiting to be committed
struct StagedClone {
    node: NodeKey,
    parent: NodeKey,
    kind: StagingKind,
}

enum StagingKind {
    /// Positioned by the arrangement engine, `fp_idx` indexes the footprints passed to it
    Arranged { fp_idx: usize },
    /// Attached to a sliceable parent as-is
    Direct,
}

impl<'a> Multiplier<'a> {
    /// Adds `count` copies of every selected object to the scene and places them `min_offset` apart.
    ///
    /// Selected nodes are resolved to their topmost group, so selecting several members of one group
    /// duplicates the group once. Objects whose parent is sliceable are attached to that parent
    /// without arrangement, all others are arranged around the fixed objects already in the scene.
    pub fn multiply_and_place(
        &self,
        selected: &[NodeKey],
        count: usize,
        min_offset: f64,
    ) -> Result<MultiplyOutcome, MultiplyError> {
        if count == 0 {
            return Err(MultiplyError::InvalidRequest(
                "count must be at least 1".to_string(),
            ));
        }
        if !(min_offset > 0.0 && min_offset.is_finite()) {
            return Err(MultiplyError::InvalidRequest(format!(
                "min_offset must be positive, got {min_offset}"
            )));
        }
        let config = self.config.clone().with_min_offset(min_offset);
        config.validate()?;
        self.work_area.validate()?;

        self.notifier.started();
        let result = self.run(selected, count, &config);
        if let Ok(outcome) = &result
            && outcome.n_unplaced > 0
        {
            self.notifier.partial_failure(outcome.n_unplaced);
        }
        self.notifier.finished();
        result
    }

    fn run(
        &self,
        selected: &[NodeKey],
        count: usize,
        config: &ArrangeConfig,
    ) -> Result<MultiplyOutcome, MultiplyError> {
        let start = Instant::now();
        let mut scene = self.scene.lock().map_err(|_| MultiplyError::LockPoisoned)?;

        let sources = resolve_sources(&scene, selected);
        //snapshot before any copy exists
        let fixed = fixed_footprints(&scene)
            .into_iter()
            .map(|(_, fp)| fp)
            .collect_vec();
        info!(
            "[MUL] multiplying {} object(s) {count} times, {} fixed obstacles",
            sources.len(),
            fixed.len()
        );

        let mut staged: Vec<StagedClone> = vec![];
        let mut footprints: Vec<Footprint> = vec![];
        if let Err(e) = stage_clones(&mut scene, &sources, count, &mut staged, &mut footprints) {
            purge(&mut scene, &staged);
            return Err(e);
        }

        let arrangement = match arrange(&footprints, &fixed, &self.work_area, config) {
            Ok(arrangement) => arrangement,
            Err(e) => {
                purge(&mut scene, &staged);
                return Err(e.into());
            }
        };

        let (command, added, omitted) = match compose_command(&scene, &staged, &arrangement) {
            Ok(composed) => composed,
            Err(e) => {
                purge(&mut scene, &staged);
                return Err(e);
            }
        };
        if let Err(e) = command.redo(&mut scene) {
            purge(&mut scene, &staged);
            return Err(e.into());
        }
        for node in omitted {
            scene.remove_subtree(node)?;
        }
        self.history
            .lock()
            .map_err(|_| MultiplyError::LockPoisoned)?
            .push(command.clone(), &mut scene);

        info!(
            "[MUL] added {} copies in {:.3}ms, {} could not be placed",
            added.len(),
            start.elapsed().as_secs_f64() * 1000.0,
            arrangement.n_unplaced
        );

        Ok(MultiplyOutcome {
            command,
            n_unplaced: arrangement.n_unplaced,
            added,
        })
    }
}

/// One command for all copies: arranged ones are added and moved, direct ones only added.
/// Also returns the added nodes and the copies left out of the command.
fn compose_command(
    scene: &Scene,
    staged: &[StagedClone],
    arrangement: &Arrangement,
) -> Result<(ReversibleCommand, Vec<NodeKey>, Vec<NodeKey>), MultiplyError> {
    let mut command = ReversibleCommand::new();
    let mut added = vec![];
    let mut omitted = vec![];
    let mut direct = vec![];

    for s in staged {
        let fp_idx = match s.kind {
            StagingKind::Arranged { fp_idx } => fp_idx,
            StagingKind::Direct => {
                direct.push(s);
                continue;
            }
        };
        let placement = arrangement.placements[fp_idx];
        let Some(dt) = placement.transform() else {
            omitted.push(s.node);
            continue;
        };
        if !placement.is_placed() {
            debug!("[MUL] copy {:?} moved next to the work area", s.node);
        }
        let from = scene.node(s.node)?.transform;
        let to = local_after_placement(scene, s.parent, &from, &dt)?;
        command.push(Operation::AddNode {
            node: s.node,
            parent: s.parent,
        });
        command.push(Operation::SetTransform {
            node: s.node,
            from,
            to,
        });
        added.push(s.node);
    }
    for s in direct {
        command.push(Operation::AddNode {
            node: s.node,
            parent: s.parent,
        });
        added.push(s.node);
    }
    Ok((command, added, omitted))
}

/// Topmost group of every selected node, each one once, in order of first appearance.
fn resolve_sources(scene: &Scene, selected: &[NodeKey]) -> Vec<NodeKey> {
    let mut sources = vec![];
    for &key in selected {
        let resolved = scene
            .topmost_group(key)
            .and_then(|top| match scene.is_reachable(top) && top != scene.root() {
                true => Ok(top),
                false => Err(SceneError::InvalidHandle(key)),
            });
        match resolved {
            Ok(top) if !sources.contains(&top) => sources.push(top),
            Ok(_) => {}
            Err(e) => warn!("[MUL] selected node skipped: {e}"),
        }
    }
    sources
}

/// Creates `count` detached copies of every source and classifies them.
fn stage_clones(
    scene: &mut Scene,
    sources: &[NodeKey],
    count: usize,
    staged: &mut Vec<StagedClone>,
    footprints: &mut Vec<Footprint>,
) -> Result<(), MultiplyError> {
    for &source in sources {
        let Some(parent) = scene.parent(source) else {
            warn!("[MUL] node {source:?} has no parent and is skipped");
            continue;
        };
        let direct = scene.node(parent)?.is_sliceable();
        //every copy sits at the source's position, so they share its footprint
        let footprint = match direct {
            true => None,
            false => match extract_footprint(scene, source) {
                Ok(fp) => Some(fp),
                Err(e) => {
                    warn!("[MUL] node {source:?} skipped: {e}");
                    continue;
                }
            },
        };

        for _ in 0..count {
            let clone = scene.deep_clone(source)?;
            let kind = match &footprint {
                Some(fp) => {
                    footprints.push(fp.clone());
                    StagingKind::Arranged {
                        fp_idx: footprints.len() - 1,
                    }
                }
                None => StagingKind::Direct,
            };
            staged.push(StagedClone {
                node: clone,
                parent,
                kind,
            });
            project_group_id(scene, source, clone)?;
        }
    }
    Ok(())
}

/// Removes all staged copies from the scene's storage.
fn purge(scene: &mut Scene, staged: &[StagedClone]) {
    for s in staged {
        if let Err(e) = scene.remove_subtree(s.node) {
            warn!("[MUL] could not purge staged copy: {e}");
        }
    }
}

/// The local transformation which, under `parent`, applies `placement` in world space after `local`.
fn local_after_placement(
    scene: &Scene,
    parent: NodeKey,
    local: &DTransformation,
    placement: &DTransformation,
) -> Result<DTransformation, MultiplyError> {
    let parent_world = scene.world_transform(parent)?.compose();
    let world = local.compose().transform(&parent_world);
    let placed_world = world.transform(&placement.compose());
    Ok(placed_world.transform(&parent_world.inverse()).decompose())
}
