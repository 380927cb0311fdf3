use std::sync::Arc;

use plater::geometry::DTransformation;
use plater::geometry::primitives::SPolygon;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node in the [`Scene`](crate::scene::Scene)
    pub struct NodeKey;
}

/// The closed set of node types a scene can hold.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Root of the scene, neither a group nor sliceable
    Root,
    /// Container of other nodes, moves as a whole
    Group,
    /// Printable object with an outline on the build plate, in local coordinates
    Mesh { outline: Arc<SPolygon> },
}

impl NodeKind {
    pub fn is_group(&self) -> bool {
        matches!(self, NodeKind::Group)
    }

    pub fn is_sliceable(&self) -> bool {
        matches!(self, NodeKind::Mesh { .. })
    }

    pub fn outline(&self) -> Option<&SPolygon> {
        match self {
            NodeKind::Mesh { outline } => Some(outline.as_ref()),
            NodeKind::Root | NodeKind::Group => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    /// Transformation relative to the parent
    pub transform: DTransformation,
    /// Id of the build plate the node belongs to
    pub build_plate: i32,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        SceneNode {
            name: name.into(),
            kind,
            transform: DTransformation::empty(),
            build_plate: 0,
            parent: None,
            children: vec![],
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        SceneNode::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, outline: SPolygon) -> Self {
        SceneNode::new(
            name,
            NodeKind::Mesh {
                outline: Arc::new(outline),
            },
        )
    }

    pub fn with_transform(mut self, transform: DTransformation) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_build_plate(mut self, build_plate: i32) -> Self {
        self.build_plate = build_plate;
        self
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    pub fn is_sliceable(&self) -> bool {
        self.kind.is_sliceable()
    }

    /// Copy of the node's own values, without links to parent or children.
    /// Outline geometry is shared, not duplicated.
    pub(crate) fn detached_copy(&self) -> Self {
        SceneNode {
            name: self.name.clone(),
            kind: self.kind.clone(),
            transform: self.transform,
            build_plate: self.build_plate,
            parent: None,
            children: vec![],
        }
    }
}
