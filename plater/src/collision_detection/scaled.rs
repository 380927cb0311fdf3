//! Fixed-point geometry.
//!
//! Coordinates are multiplied by a scale factor and rounded to `i64`.
//! Orientation tests are evaluated with `i128` cross products and are therefore exact.

use anyhow::{Result, ensure};
use itertools::Itertools;

use crate::geometry::primitives::{Point, SPolygon};

/// Point in the scaled integer space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IPoint(pub i64, pub i64);

impl IPoint {
    pub fn from_point(p: Point, factor: f64) -> Self {
        IPoint((p.0 * factor).round() as i64, (p.1 * factor).round() as i64)
    }

    pub fn to_point(self, factor: f64) -> Point {
        Point(self.0 as f64 / factor, self.1 as f64 / factor)
    }

    pub fn sq_distance(&self, other: &IPoint) -> i128 {
        let dx = (self.0 - other.0) as i128;
        let dy = (self.1 - other.1) as i128;
        dx * dx + dy * dy
    }
}

/// Twice the signed area of triangle `a`, `b`, `c`.
/// Positive if `c` lies to the left of `a -> b`.
#[inline(always)]
pub fn orientation(a: IPoint, b: IPoint, c: IPoint) -> i128 {
    let (abx, aby) = ((b.0 - a.0) as i128, (b.1 - a.1) as i128);
    let (acx, acy) = ((c.0 - a.0) as i128, (c.1 - a.1) as i128);
    abx * acy - aby * acx
}

/// Axis-aligned rectangle in the scaled integer space
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IRect {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

impl IRect {
    pub fn from_points(points: &[IPoint]) -> Self {
        let (x_min, x_max) = points
            .iter()
            .map(|p| p.0)
            .minmax()
            .into_option()
            .unwrap_or((0, 0));
        let (y_min, y_max) = points
            .iter()
            .map(|p| p.1)
            .minmax()
            .into_option()
            .unwrap_or((0, 0));
        IRect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Whether the interiors of both rectangles intersect. Touching rectangles do not overlap.
    #[inline(always)]
    pub fn overlaps(&self, other: &IRect) -> bool {
        i64::max(self.x_min, other.x_min) < i64::min(self.x_max, other.x_max)
            && i64::max(self.y_min, other.y_min) < i64::min(self.y_max, other.y_max)
    }

    /// Whether `other` lies entirely within `self`, boundaries included.
    #[inline(always)]
    pub fn contains(&self, other: &IRect) -> bool {
        self.x_min <= other.x_min
            && self.y_min <= other.y_min
            && self.x_max >= other.x_max
            && self.y_max >= other.y_max
    }

    pub fn translated(&self, (dx, dy): (i64, i64)) -> IRect {
        IRect {
            x_min: self.x_min + dx,
            y_min: self.y_min + dy,
            x_max: self.x_max + dx,
            y_max: self.y_max + dy,
        }
    }

    pub fn width(&self) -> i64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i64 {
        self.y_max - self.y_min
    }
}

/// Convex polygon in the scaled integer space, vertices ordered counterclockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledPolygon {
    pub vertices: Vec<IPoint>,
    pub bbox: IRect,
}

impl ScaledPolygon {
    /// Scales and rounds `points` and takes the convex hull of the result.
    pub fn from_points(points: &[Point], factor: f64) -> Result<Self> {
        let scaled = points
            .iter()
            .map(|p| IPoint::from_point(*p, factor))
            .collect_vec();
        let vertices = convex_hull(scaled);
        ensure!(
            vertices.len() >= 3,
            "shape collapses to {} vertices at scale factor {factor}",
            vertices.len()
        );
        let bbox = IRect::from_points(&vertices);
        Ok(ScaledPolygon { vertices, bbox })
    }

    /// Stores `reference` translated by `(dx, dy)` in `self`, reusing the allocation.
    pub fn translate_from(&mut self, reference: &Self, (dx, dy): (i64, i64)) -> &mut Self {
        self.vertices.clear();
        self.vertices
            .extend(reference.vertices.iter().map(|p| IPoint(p.0 + dx, p.1 + dy)));
        self.bbox = reference.bbox.translated((dx, dy));
        self
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = (IPoint, IPoint)> + '_ {
        self.vertices
            .iter()
            .copied()
            .circular_tuple_windows::<(IPoint, IPoint)>()
    }

    /// Whether the interiors of `self` and `other` intersect (separating axis theorem).
    /// Polygons that only touch along an edge or in a vertex do not collide.
    pub fn collides_with(&self, other: &ScaledPolygon) -> bool {
        if !self.bbox.overlaps(&other.bbox) {
            return false;
        }
        !(has_separating_edge(self, other) || has_separating_edge(other, self))
    }

    /// Whether `p` lies strictly inside `self`.
    pub fn strictly_contains(&self, p: IPoint) -> bool {
        self.edge_iter().all(|(a, b)| orientation(a, b, p) > 0)
    }
}

//an edge of `a` separates the polygons if all vertices of `b` lie on or right of it
fn has_separating_edge(a: &ScaledPolygon, b: &ScaledPolygon) -> bool {
    a.edge_iter()
        .any(|(s, e)| b.vertices.iter().all(|v| orientation(s, e, *v) <= 0))
}

/// Exact monotone chain convex hull, counterclockwise, collinear points removed.
pub fn convex_hull(mut points: Vec<IPoint>) -> Vec<IPoint> {
    points.sort();
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let grow = |mut h: Vec<IPoint>, next: &IPoint| {
        while h.len() >= 2 && orientation(h[h.len() - 2], h[h.len() - 1], *next) <= 0 {
            h.pop();
        }
        h.push(*next);
        h
    };

    let mut lower = points.iter().fold(vec![], grow);
    let mut upper = points.iter().rev().fold(vec![], grow);
    lower.pop();
    upper.pop();
    lower.append(&mut upper);
    lower
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    OnBoundary,
    Outside,
}

/// Boundary of a work area in the scaled integer space. May be non-convex.
#[derive(Clone, Debug)]
pub struct ScaledBoundary {
    pub vertices: Vec<IPoint>,
    pub bbox: IRect,
    /// Boundaries which coincide with their bounding box allow a bbox-only containment test
    pub rectangular: bool,
}

impl ScaledBoundary {
    pub fn new(shape: &SPolygon, factor: f64) -> Result<Self> {
        let mut vertices = shape
            .vertices
            .iter()
            .map(|p| IPoint::from_point(*p, factor))
            .dedup()
            .collect_vec();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        ensure!(
            vertices.len() >= 3,
            "boundary collapses to {} vertices at scale factor {factor}",
            vertices.len()
        );

        let doubled_area = vertices
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| a.0 as i128 * b.1 as i128 - b.0 as i128 * a.1 as i128)
            .sum::<i128>();
        ensure!(doubled_area != 0, "boundary has no area at scale factor {factor}");
        if doubled_area < 0 {
            vertices.reverse();
        }

        let bbox = IRect::from_points(&vertices);
        let bbox_doubled_area = 2 * bbox.width() as i128 * bbox.height() as i128;
        let rectangular = bbox_doubled_area == doubled_area.abs();

        Ok(ScaledBoundary {
            vertices,
            bbox,
            rectangular,
        })
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = (IPoint, IPoint)> + '_ {
        self.vertices
            .iter()
            .copied()
            .circular_tuple_windows::<(IPoint, IPoint)>()
    }

    /// Exact point location, based on the winding number.
    pub fn locate(&self, p: IPoint) -> PointLocation {
        let mut winding = 0;
        for (a, b) in self.edge_iter() {
            let o = orientation(a, b, p);
            if o == 0 && on_segment(a, b, p) {
                return PointLocation::OnBoundary;
            }
            if a.1 <= p.1 {
                if b.1 > p.1 && o > 0 {
                    winding += 1;
                }
            } else if b.1 <= p.1 && o < 0 {
                winding -= 1;
            }
        }
        match winding {
            0 => PointLocation::Outside,
            _ => PointLocation::Inside,
        }
    }

    /// Whether the convex `shape` lies entirely inside the boundary (touching allowed).
    pub fn contains(&self, shape: &ScaledPolygon) -> bool {
        if !self.bbox.contains(&shape.bbox) {
            return false;
        }
        if self.rectangular {
            return true;
        }
        let vertices_inside = shape
            .vertices
            .iter()
            .all(|v| self.locate(*v) != PointLocation::Outside);

        vertices_inside
            && !self
                .vertices
                .iter()
                .any(|bv| shape.strictly_contains(*bv))
            && !shape.edge_iter().any(|(s1, e1)| {
                self.edge_iter()
                    .any(|(s2, e2)| segments_cross_properly(s1, e1, s2, e2))
            })
    }
}

fn on_segment(a: IPoint, b: IPoint, p: IPoint) -> bool {
    i64::min(a.0, b.0) <= p.0
        && p.0 <= i64::max(a.0, b.0)
        && i64::min(a.1, b.1) <= p.1
        && p.1 <= i64::max(a.1, b.1)
}

fn segments_cross_properly(p1: IPoint, p2: IPoint, q1: IPoint, q2: IPoint) -> bool {
    let o1 = orientation(p1, p2, q1).signum();
    let o2 = orientation(p1, p2, q2).signum();
    let o3 = orientation(q1, q2, p1).signum();
    let o4 = orientation(q1, q2, p2).signum();
    o1 * o2 < 0 && o3 * o4 < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i64, y: i64, size: i64) -> ScaledPolygon {
        let vertices = vec![
            IPoint(x, y),
            IPoint(x + size, y),
            IPoint(x + size, y + size),
            IPoint(x, y + size),
        ];
        let bbox = IRect::from_points(&vertices);
        ScaledPolygon { vertices, bbox }
    }

    #[test]
    fn touching_squares_do_not_collide() {
        let a = square(0, 0, 10);
        assert!(!a.collides_with(&square(10, 0, 10)));
        assert!(!a.collides_with(&square(10, 10, 10)));
        assert!(a.collides_with(&square(9, 9, 10)));
        assert!(a.collides_with(&square(2, 2, 2)));
    }

    #[test]
    fn separating_axis_on_diagonal() {
        //bounding boxes overlap, shapes do not
        let tri_a = ScaledPolygon {
            vertices: vec![IPoint(0, 0), IPoint(10, 0), IPoint(0, 10)],
            bbox: IRect::from_points(&[IPoint(0, 0), IPoint(10, 10)]),
        };
        let tri_b = ScaledPolygon {
            vertices: vec![IPoint(10, 1), IPoint(10, 10), IPoint(1, 10)],
            bbox: IRect::from_points(&[IPoint(1, 1), IPoint(10, 10)]),
        };
        assert!(!tri_a.collides_with(&tri_b));
    }

    #[test]
    fn l_shaped_boundary_containment() {
        let l_shape = SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(20.0, 0.0),
            Point(20.0, 10.0),
            Point(10.0, 10.0),
            Point(10.0, 20.0),
            Point(0.0, 20.0),
        ])
        .unwrap();
        let boundary = ScaledBoundary::new(&l_shape, 1.0).unwrap();
        assert!(!boundary.rectangular);
        assert!(boundary.contains(&square(0, 0, 10)));
        assert!(boundary.contains(&square(10, 0, 10)));
        assert!(boundary.contains(&square(0, 10, 10)));
        //bounding box fits, but the square sits in the notch
        assert!(!boundary.contains(&square(11, 11, 5)));
        //straddles the inner corner
        assert!(!boundary.contains(&square(5, 5, 10)));
        assert_eq!(boundary.locate(IPoint(10, 15)), PointLocation::OnBoundary);
        assert_eq!(boundary.locate(IPoint(15, 15)), PointLocation::Outside);
    }

    #[test]
    fn rounding_keeps_hull_convex() {
        let points = [
            Point(0.00004, 0.0),
            Point(1.0, 0.00004),
            Point(1.0, 1.0),
            Point(0.5, 1.00001),
            Point(0.0, 1.0),
        ];
        let poly = ScaledPolygon::from_points(&points, 10_000.0).unwrap();
        assert!(
            poly.edge_iter()
                .tuple_windows()
                .all(|((a, b), (_, c))| orientation(a, b, c) > 0)
        );
    }
}
