use plater::geometry::DTransformation;

use crate::SceneError;
use crate::scene::{NodeKey, Scene};

/// Atomic, reversible scene mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Attaches a detached node as last child of `parent`
    AddNode { node: NodeKey, parent: NodeKey },
    /// Replaces the local transformation of `node`
    SetTransform {
        node: NodeKey,
        from: DTransformation,
        to: DTransformation,
    },
}

impl Operation {
    pub fn redo(&self, scene: &mut Scene) -> Result<(), SceneError> {
        match self {
            Operation::AddNode { node, parent } => scene.attach(*node, *parent),
            Operation::SetTransform { node, to, .. } => scene.set_transform(*node, *to),
        }
    }

    pub fn undo(&self, scene: &mut Scene) -> Result<(), SceneError> {
        match self {
            Operation::AddNode { node, parent } => match scene.parent(*node) {
                Some(p) if p == *parent => scene.detach(*node),
                _ => Err(SceneError::NotAttached(*node)),
            },
            Operation::SetTransform { node, from, .. } => scene.set_transform(*node, *from),
        }
    }
}
