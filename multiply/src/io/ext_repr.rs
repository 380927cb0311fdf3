use plater::geometry::DTransformation;
use serde::{Deserialize, Serialize};

/// External representation of a [`Scene`](crate::scene::Scene), the work area it is arranged on
/// and the nodes selected for multiplication.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtScene {
    pub work_area: ExtWorkArea,
    /// Top level nodes, children of the scene root
    pub nodes: Vec<ExtNode>,
    /// Ids of the selected nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<u64>,
}

/// External representation of a [`WorkArea`](plater::entities::WorkArea)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtWorkArea {
    /// Rectangle centred at the origin
    Rectangle {
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<usize>,
    },
    /// Simple polygon, may be non-convex
    Polygon {
        points: Vec<(f64, f64)>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<usize>,
    },
}

/// External representation of a [`SceneNode`](crate::scene::SceneNode)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtNode {
    /// Unique identifier of the node
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ExtNodeKind,
    /// Transformation relative to the parent node
    #[serde(default)]
    pub transformation: ExtTransformation,
    #[serde(default)]
    pub build_plate: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExtNode>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtNodeKind {
    Group,
    /// Printable object, its outline on the build plate in local coordinates
    Mesh { outline: Vec<(f64, f64)> },
}

/// Represents a proper rigid transformation defined as a rotation followed by translation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtTransformation {
    /// The rotation angle in degrees
    pub rotation: f64,
    /// The translation vector (x, y)
    pub translation: (f64, f64),
}

impl From<&DTransformation> for ExtTransformation {
    fn from(dt: &DTransformation) -> Self {
        ExtTransformation {
            rotation: dt.rotation().to_degrees(),
            translation: dt.translation(),
        }
    }
}

impl From<&ExtTransformation> for DTransformation {
    fn from(ext: &ExtTransformation) -> Self {
        DTransformation::new(ext.rotation.to_radians(), ext.translation)
    }
}
