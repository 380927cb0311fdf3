use std::f64::consts::PI;

use itertools::Itertools;

use crate::geometry::convex_hull::convex_hull_from_points;
use crate::geometry::primitives::Point;

/// Inflates the convex hull of `points` by `distance` in every direction.
///
/// The offset is the Minkowski sum with a regular `n_segments`-gon that circumscribes the disc of
/// radius `distance`. The result is therefore always a (convex) superset of the exact offset.
pub fn inflate_convex(points: &[Point], distance: f64, n_segments: usize) -> Vec<Point> {
    if distance <= 0.0 || n_segments < 3 {
        return convex_hull_from_points(points.to_vec());
    }
    let circumradius = distance / (PI / n_segments as f64).cos();
    let disc = (0..n_segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n_segments as f64;
            let (sin, cos) = angle.sin_cos();
            (circumradius * cos, circumradius * sin)
        })
        .collect_vec();

    let hull = convex_hull_from_points(points.to_vec());
    let summed = hull
        .iter()
        .cartesian_product(disc.iter())
        .map(|(p, (dx, dy))| Point(p.0 + dx, p.1 + dy))
        .collect_vec();

    convex_hull_from_points(summed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geo_traits::DistanceTo;
    use crate::geometry::primitives::SPolygon;

    #[test]
    fn inflated_square_keeps_clearance() {
        let square = [
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
        ];
        let inflated = SPolygon::new(inflate_convex(&square, 2.0, 16)).unwrap();
        let original = SPolygon::new(square.to_vec()).unwrap();

        //every vertex of the inflated shape is at least the offset away from the original
        for v in inflated.vertices.iter() {
            assert!(original.distance_to(v) >= 2.0 - 1e-9);
        }
        assert!(inflated.bbox.x_min <= -2.0 && inflated.bbox.x_max >= 12.0);
    }

    #[test]
    fn zero_distance_is_the_hull() {
        let triangle = [Point(0.0, 0.0), Point(4.0, 0.0), Point(0.0, 3.0)];
        assert_eq!(inflate_convex(&triangle, 0.0, 16).len(), 3);
    }
}
