use plater::geometry::primitives::{Point, SPolygon};
use serde::{Deserialize, Serialize};
use svg::node::element::Path;
use svg::node::element::path::Data;

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgDrawOptions {
    pub theme: SvgSceneThemes,
    /// Draws the footprint of every top level object
    pub footprints: bool,
    /// Marks the centre of the work area
    pub center: bool,
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub enum SvgSceneThemes {
    #[default]
    EarthTones,
    Gray,
}

impl SvgSceneThemes {
    pub fn theme(&self) -> SvgSceneTheme {
        match self {
            SvgSceneThemes::EarthTones => EARTH_TONES_THEME,
            SvgSceneThemes::Gray => GRAY_THEME,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SvgSceneTheme {
    pub stroke_width_multiplier: f64,
    pub plate_fill: &'static str,
    pub object_fill: &'static str,
    pub added_fill: &'static str,
    pub footprint_stroke: &'static str,
}

pub static EARTH_TONES_THEME: SvgSceneTheme = SvgSceneTheme {
    stroke_width_multiplier: 2.0,
    plate_fill: "#CC824A",
    object_fill: "#FFC879",
    added_fill: "#8FBC5A",
    footprint_stroke: "#2D2D2D",
};

pub static GRAY_THEME: SvgSceneTheme = SvgSceneTheme {
    stroke_width_multiplier: 2.5,
    plate_fill: "#C3C3C3",
    object_fill: "#8F8F8F",
    added_fill: "#636363",
    footprint_stroke: "#000000",
};

pub fn s_polygon_data(s_poly: &SPolygon) -> Data {
    points_data(&s_poly.vertices)
}

pub fn points_data(points: &[Point]) -> Data {
    let mut data = Data::new();
    for (i, p) in points.iter().enumerate() {
        data = match i {
            0 => data.move_to((p.0, p.1)),
            _ => data.line_to((p.0, p.1)),
        };
    }
    data.close()
}

pub fn data_to_path(data: Data, params: &[(&str, String)]) -> Path {
    let mut path = Path::new();
    for (key, value) in params {
        path = path.set(*key, value.as_str());
    }
    path.set("d", data)
}
