use itertools::Itertools;
use plater::entities::Footprint;
use plater::geometry::geo_traits::Transformable;

use crate::SceneError;
use crate::scene::{NodeKey, Scene};

/// Derives the footprint of `key`: the convex hull of the world outlines of every sliceable node in its subtree.
///
/// For a mesh this includes its own outline, for a group only those of its descendants.
/// The scene is not modified.
pub fn extract_footprint(scene: &Scene, key: NodeKey) -> Result<Footprint, SceneError> {
    scene.node(key)?;

    let mut points = vec![];
    for k in scene.dfs(key) {
        if let Some(outline) = scene.node(k)?.kind.outline() {
            let t = scene.world_transform(k)?.compose();
            points.extend(outline.vertices.iter().map(|p| p.transform_clone(&t)));
        }
    }
    if points.is_empty() {
        return Err(SceneError::MissingCapability {
            node: key,
            reason: "no sliceable geometry in subtree".to_string(),
        });
    }

    let points = points.into_iter().unique().collect_vec();
    Footprint::from_points(points).map_err(|e| SceneError::MissingCapability {
        node: key,
        reason: format!("degenerate footprint: {e}"),
    })
}

/// Copies the build plate id of `source` onto `clone` and every node below it.
pub fn project_group_id(
    scene: &mut Scene,
    source: NodeKey,
    clone: NodeKey,
) -> Result<(), SceneError> {
    let build_plate = scene.node(source)?.build_plate;
    for key in scene.dfs(clone) {
        scene.node_mut(key)?.build_plate = build_plate;
    }
    Ok(())
}

/// Sliceable nodes reachable from the root, with their footprints.
/// Nodes whose footprint cannot be derived are skipped.
pub fn fixed_footprints(scene: &Scene) -> Vec<(NodeKey, Footprint)> {
    scene
        .reachable()
        .into_iter()
        .filter(|k| scene.node(*k).is_ok_and(|n| n.is_sliceable()))
        .filter_map(|k| match extract_footprint(scene, k) {
            Ok(fp) => Some((k, fp)),
            Err(e) => {
                log::warn!("[MUL] node ignored as obstacle: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use float_cmp::approx_eq;
    use plater::geometry::DTransformation;
    use plater::geometry::primitives::{Point, Rect, SPolygon};

    fn square(size: f64) -> SPolygon {
        SPolygon::from(Rect::from_center(Point(0.0, 0.0), size, size).unwrap())
    }

    #[test]
    fn group_footprint_spans_all_meshes() {
        let mut scene = Scene::new();
        let group = scene
            .add_node(
                SceneNode::group("g").with_transform(DTransformation::new(0.0, (100.0, 0.0))),
                scene.root(),
            )
            .unwrap();
        for x in [-20.0, 20.0] {
            let mesh = SceneNode::mesh("m", square(10.0))
                .with_transform(DTransformation::new(0.0, (x, 0.0)));
            scene.add_node(mesh, group).unwrap();
        }

        let fp = extract_footprint(&scene, group).unwrap();
        assert!(approx_eq!(f64, fp.shape.bbox.x_min, 75.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, fp.shape.bbox.x_max, 125.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, fp.area(), 500.0, epsilon = 1e-6));
        assert_eq!(fp.reference, Point(100.0, 0.0));
    }

    #[test]
    fn nodes_without_geometry_have_no_footprint() {
        let mut scene = Scene::new();
        let group = scene.add_node(SceneNode::group("empty"), scene.root()).unwrap();
        assert!(matches!(
            extract_footprint(&scene, group),
            Err(SceneError::MissingCapability { .. })
        ));
        assert!(matches!(
            extract_footprint(&scene, scene.root()),
            Err(SceneError::MissingCapability { .. })
        ));
    }

    #[test]
    fn build_plate_is_projected_onto_subtree() {
        let mut scene = Scene::new();
        let group = scene
            .add_node(SceneNode::group("g").with_build_plate(3), scene.root())
            .unwrap();
        scene.add_node(SceneNode::mesh("m", square(1.0)), group).unwrap();

        let clone = scene.deep_clone(group).unwrap();
        for key in scene.dfs(clone) {
            scene.node_mut(key).unwrap().build_plate = 0;
        }
        project_group_id(&mut scene, group, clone).unwrap();
        assert!(scene.dfs(clone).iter().all(|k| scene.node(*k).unwrap().build_plate == 3));
    }
}
