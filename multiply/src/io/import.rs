use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use itertools::Itertools;
use log::warn;
use plater::entities::WorkArea;
use plater::geometry::primitives::{Point, SPolygon};

use crate::io::ext_repr::{ExtNode, ExtNodeKind, ExtScene, ExtWorkArea};
use crate::scene::{NodeKey, Scene, SceneNode};

/// A scene built from its external representation.
#[derive(Debug)]
pub struct ImportedScene {
    pub scene: Scene,
    pub work_area: WorkArea,
    pub selection: Vec<NodeKey>,
    /// External id of every imported node
    pub ids: HashMap<NodeKey, u64>,
}

pub fn import_scene(ext_scene: &ExtScene) -> Result<ImportedScene> {
    let work_area = import_work_area(&ext_scene.work_area)?;

    let mut scene = Scene::new();
    let mut keys = HashMap::new();
    for ext_node in &ext_scene.nodes {
        let root = scene.root();
        import_node(&mut scene, ext_node, root, &mut keys)?;
    }

    let selection = ext_scene
        .selection
        .iter()
        .filter_map(|id| match keys.get(id) {
            Some(key) => Some(*key),
            None => {
                warn!("[IO] selected node {id} does not exist");
                None
            }
        })
        .collect_vec();

    let ids = keys.into_iter().map(|(id, key)| (key, id)).collect();
    Ok(ImportedScene {
        scene,
        work_area,
        selection,
        ids,
    })
}

pub fn import_work_area(ext_work_area: &ExtWorkArea) -> Result<WorkArea> {
    let work_area = match ext_work_area {
        ExtWorkArea::Rectangle {
            width,
            height,
            capacity,
        } => WorkArea::from_rect(*width, *height).map(|wa| WorkArea {
            capacity: *capacity,
            ..wa
        })?,
        ExtWorkArea::Polygon { points, capacity } => {
            let shape = import_polygon(points).context("invalid work area polygon")?;
            WorkArea::new(shape, *capacity)?
        }
    };
    Ok(work_area)
}

fn import_node(
    scene: &mut Scene,
    ext_node: &ExtNode,
    parent: NodeKey,
    keys: &mut HashMap<u64, NodeKey>,
) -> Result<NodeKey> {
    if keys.contains_key(&ext_node.id) {
        bail!("duplicate node id: {}", ext_node.id);
    }
    let node = match &ext_node.kind {
        ExtNodeKind::Group => SceneNode::group(ext_node.name.clone()),
        ExtNodeKind::Mesh { outline } => {
            let outline = import_polygon(outline)
                .with_context(|| format!("invalid outline for node {}", ext_node.id))?;
            SceneNode::mesh(ext_node.name.clone(), outline)
        }
    }
    .with_transform((&ext_node.transformation).into())
    .with_build_plate(ext_node.build_plate);

    let key = scene.add_node(node, parent)?;
    keys.insert(ext_node.id, key);
    for child in &ext_node.children {
        import_node(scene, child, key, keys)?;
    }
    Ok(key)
}

fn import_polygon(points: &[(f64, f64)]) -> Result<SPolygon> {
    SPolygon::new(points.iter().map(|&(x, y)| Point(x, y)).collect())
}
