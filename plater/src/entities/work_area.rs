use crate::ArrangeError;
use crate::geometry::primitives::{Point, Rect, SPolygon};

/// The region of the build plate on which footprints may be placed.
#[derive(Clone, Debug)]
pub struct WorkArea {
    /// Boundary of the area, a simple polygon which may be non-convex
    pub shape: SPolygon,
    /// Maximum number of new footprints that can be placed in a single arrangement, if any
    pub capacity: Option<usize>,
}

impl WorkArea {
    pub fn new(shape: SPolygon, capacity: Option<usize>) -> Result<Self, ArrangeError> {
        let area = WorkArea { shape, capacity };
        area.validate()?;
        Ok(area)
    }

    /// Rectangular work area of `width` by `height`, centred at the origin.
    pub fn from_rect(width: f64, height: f64) -> Result<Self, ArrangeError> {
        let rect = Rect::from_center(Point(0.0, 0.0), width, height)
            .map_err(|e| ArrangeError::InvalidWorkArea(e.to_string()))?;
        WorkArea::new(SPolygon::from(rect), None)
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn bbox(&self) -> Rect {
        self.shape.bbox
    }

    /// Centre of the work area's bounding box, all probing radiates out from here
    pub fn center(&self) -> Point {
        self.shape.bbox.centroid()
    }

    pub fn validate(&self) -> Result<(), ArrangeError> {
        let bbox = self.shape.bbox;
        let extent_ok = bbox.width() > 0.0 && bbox.height() > 0.0 && self.shape.area > 0.0;
        if !extent_ok || !bbox.width().is_finite() || !bbox.height().is_finite() {
            return Err(ArrangeError::InvalidWorkArea(format!(
                "work area must have a positive, finite extent, got {:.3} x {:.3}",
                bbox.width(),
                bbox.height()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(200.0, 200.0, true; "square")]
    #[test_case(250.0, 210.0, true; "rectangle")]
    #[test_case(0.0, 200.0, false; "zero width")]
    #[test_case(200.0, -1.0, false; "negative height")]
    fn rectangular_work_areas(width: f64, height: f64, valid: bool) {
        let area = WorkArea::from_rect(width, height);
        assert_eq!(area.is_ok(), valid);
        if let Ok(area) = area {
            assert_eq!(area.center(), Point(0.0, 0.0));
            assert_eq!(area.bbox().width(), width);
        }
    }
}
