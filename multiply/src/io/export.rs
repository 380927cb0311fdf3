use std::collections::HashMap;

use crate::io::ext_repr::{ExtNode, ExtNodeKind, ExtScene, ExtWorkArea};
use crate::scene::{NodeKind, NodeKey, Scene};

/// Converts the part of `scene` reachable from the root to its external representation.
///
/// Nodes without an external id (new copies) get fresh ids, which are recorded in `ids`.
pub fn export_scene(
    scene: &Scene,
    work_area: &ExtWorkArea,
    ids: &mut HashMap<NodeKey, u64>,
) -> ExtScene {
    let mut next_id = ids.values().max().map_or(0, |id| id + 1);
    let nodes = scene
        .children(scene.root())
        .iter()
        .filter_map(|key| export_node(scene, *key, ids, &mut next_id))
        .collect();

    ExtScene {
        work_area: work_area.clone(),
        nodes,
        selection: vec![],
    }
}

fn export_node(
    scene: &Scene,
    key: NodeKey,
    ids: &mut HashMap<NodeKey, u64>,
    next_id: &mut u64,
) -> Option<ExtNode> {
    let node = scene.node(key).ok()?;
    let id = *ids.entry(key).or_insert_with(|| {
        *next_id += 1;
        *next_id - 1
    });
    let kind = match &node.kind {
        NodeKind::Mesh { outline } => ExtNodeKind::Mesh {
            outline: outline.vertices.iter().map(|p| (p.0, p.1)).collect(),
        },
        NodeKind::Group | NodeKind::Root => ExtNodeKind::Group,
    };
    let children = node
        .children()
        .iter()
        .filter_map(|c| export_node(scene, *c, ids, next_id))
        .collect();

    Some(ExtNode {
        id,
        name: node.name.clone(),
        kind,
        transformation: (&node.transform).into(),
        build_plate: node.build_plate,
        children,
    })
}
