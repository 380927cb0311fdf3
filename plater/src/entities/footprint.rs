use std::sync::Arc;

use anyhow::Result;

use crate::geometry::DTransformation;
use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{Point, SPolygon};

/// Two-dimensional shadow of an object on the build plate, used for overlap tests.
#[derive(Clone, Debug)]
pub struct Footprint {
    /// Convex outline in world coordinates
    pub shape: Arc<SPolygon>,
    /// Pivot for rotations and anchor for positioning: the centre of the bounding box
    pub reference: Point,
}

impl Footprint {
    /// Creates a footprint from the convex hull of `points`.
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        Ok(Footprint::new(SPolygon::convex_hull_of(points)?))
    }

    pub fn new(shape: SPolygon) -> Self {
        let reference = shape.bbox.centroid();
        Footprint {
            shape: Arc::new(shape),
            reference,
        }
    }

    pub fn area(&self) -> f64 {
        self.shape.area
    }

    /// Vertices of the footprint rotated by `rotation` radians around its reference point,
    /// expressed relative to that reference point.
    pub fn local_points(&self, rotation: f64) -> Vec<Point> {
        let origin = Point(0.0, 0.0);
        self.shape
            .vertices
            .iter()
            .map(|p| {
                Point(p.0 - self.reference.0, p.1 - self.reference.1)
                    .rotated_around(origin, rotation)
            })
            .collect()
    }

    /// The transformation which rotates the footprint by `rotation` radians around its reference
    /// point and moves that reference point onto `target`.
    pub fn placement_transform(&self, rotation: f64, target: Point) -> DTransformation {
        let rotated_ref = self.reference.rotated_around(Point(0.0, 0.0), rotation);
        DTransformation::new(
            rotation,
            (target.0 - rotated_ref.0, target.1 - rotated_ref.1),
        )
    }

    /// The footprint's shape after applying `dt`.
    pub fn transformed_shape(&self, dt: &DTransformation) -> SPolygon {
        let mut shape = self.shape.as_ref().clone();
        shape.transform(&dt.compose());
        shape
    }
}
