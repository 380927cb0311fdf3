use std::collections::HashSet;

use itertools::Itertools;
use log::warn;
use plater::entities::WorkArea;
use plater::geometry::geo_traits::Transformable;
use plater::geometry::primitives::Rect;
use svg::Document;
use svg::node::element::{Circle, Group, Title};

use crate::extract::extract_footprint;
use crate::io::svg_util::{SvgDrawOptions, data_to_path, points_data, s_polygon_data};
use crate::scene::{NodeKey, Scene};

/// Draws the work area and the outline of every sliceable node on it, seen from above.
/// Nodes in the subtrees of `highlighted` are drawn in a different color.
pub fn scene_to_svg(
    scene: &Scene,
    work_area: &WorkArea,
    highlighted: &[NodeKey],
    options: SvgDrawOptions,
    title: &str,
) -> Document {
    let theme = options.theme.theme();
    let highlighted = highlighted
        .iter()
        .flat_map(|k| scene.dfs(*k))
        .collect::<HashSet<_>>();

    let mut outlines = vec![];
    for key in scene.reachable() {
        let Ok(node) = scene.node(key) else { continue };
        let Some(outline) = node.kind.outline() else {
            continue;
        };
        match scene.world_transform(key) {
            Ok(dt) => {
                let mut world = outline.clone();
                world.transform(&dt.compose());
                outlines.push((highlighted.contains(&key), world));
            }
            Err(e) => warn!("[SVG] outline of {key:?} not drawn: {e}"),
        }
    }

    let bbox = outlines
        .iter()
        .map(|(_, o)| o.bbox)
        .fold(work_area.bbox(), Rect::bounding_rect);
    let stroke_width =
        f64::max(bbox.width(), bbox.height()) * 0.001 * theme.stroke_width_multiplier;
    let margin = f64::max(bbox.width(), bbox.height()) * 0.05;

    //svg's y-axis points down, flip everything around the x-axis
    let mut group = Group::new().set("transform", "scale(1 -1)").add(data_to_path(
        s_polygon_data(&work_area.shape),
        &[
            ("fill", theme.plate_fill.to_string()),
            ("stroke", "black".to_string()),
            ("stroke-width", (2.0 * stroke_width).to_string()),
        ],
    ));

    for (is_added, outline) in &outlines {
        let fill = match is_added {
            true => theme.added_fill,
            false => theme.object_fill,
        };
        group = group.add(data_to_path(
            s_polygon_data(outline),
            &[
                ("fill", fill.to_string()),
                ("stroke", "black".to_string()),
                ("stroke-width", stroke_width.to_string()),
            ],
        ));
    }

    if options.footprints {
        for key in scene.children(scene.root()).iter() {
            if let Ok(fp) = extract_footprint(scene, *key) {
                group = group.add(data_to_path(
                    points_data(&fp.shape.vertices),
                    &[
                        ("fill", "none".to_string()),
                        ("stroke", theme.footprint_stroke.to_string()),
                        ("stroke-width", stroke_width.to_string()),
                        ("stroke-dasharray", (4.0 * stroke_width).to_string()),
                    ],
                ));
            }
        }
    }

    if options.center {
        let center = work_area.center();
        group = group.add(
            Circle::new()
                .set("cx", center.0)
                .set("cy", center.1)
                .set("r", 3.0 * stroke_width)
                .set("fill", "black"),
        );
    }

    let view = bbox.resize_by(margin, margin).unwrap_or(bbox);
    let view_box = (view.x_min, -view.y_max, view.width(), view.height());
    let n_added = outlines.iter().filter(|(added, _)| *added).count();
    let title = [title.to_string(), format!("{} objects, {n_added} added", outlines.len())]
        .into_iter()
        .filter(|s| !s.is_empty())
        .join(" | ");

    Document::new()
        .set("viewBox", view_box)
        .add(Title::new(title))
        .add(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use plater::geometry::primitives::{Point, SPolygon};

    #[test]
    fn document_contains_every_outline() {
        let mut scene = Scene::new();
        let outline = SPolygon::from(Rect::from_center(Point(0.0, 0.0), 10.0, 10.0).unwrap());
        let a = scene
            .add_node(SceneNode::mesh("a", outline.clone()), scene.root())
            .unwrap();
        scene.add_node(SceneNode::mesh("b", outline), scene.root()).unwrap();
        let work_area = WorkArea::from_rect(100.0, 100.0).unwrap();

        let svg = scene_to_svg(&scene, &work_area, &[a], SvgDrawOptions::default(), "test").to_string();
        //work area and two outlines
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("2 objects, 1 added"));
    }
}
