mod history;
mod operation;

use log::warn;

use crate::SceneError;
use crate::scene::Scene;

#[doc(inline)]
pub use history::CommandHistory;
#[doc(inline)]
pub use operation::Operation;

/// Ordered batch of [`Operation`]s, applied and reversed as a single unit.
///
/// If an operation fails halfway, the ones already applied are reverted before the error is returned,
/// the scene is never left in a partially mutated state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReversibleCommand {
    operations: Vec<Operation>,
}

impl ReversibleCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Applies all operations in order.
    pub fn redo(&self, scene: &mut Scene) -> Result<(), SceneError> {
        for (i, op) in self.operations.iter().enumerate() {
            if let Err(e) = op.redo(scene) {
                for applied in self.operations[..i].iter().rev() {
                    if let Err(rollback_err) = applied.undo(scene) {
                        warn!("[CMD] rollback of {applied:?} failed: {rollback_err}");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Reverts all operations in reverse order.
    pub fn undo(&self, scene: &mut Scene) -> Result<(), SceneError> {
        for (i, op) in self.operations.iter().enumerate().rev() {
            if let Err(e) = op.undo(scene) {
                for reverted in self.operations[i + 1..].iter() {
                    if let Err(rollback_err) = reverted.redo(scene) {
                        warn!("[CMD] rollback of {reverted:?} failed: {rollback_err}");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Removes the nodes this command would add from storage, as long as they are detached.
    /// Called once an undone command can no longer be redone.
    pub fn discard(&self, scene: &mut Scene) {
        for op in &self.operations {
            if let Operation::AddNode { node, .. } = op
                && scene.contains(*node)
                && scene.parent(*node).is_none()
                && let Err(e) = scene.remove_subtree(*node)
            {
                warn!("[CMD] could not discard {node:?}: {e}");
            }
        }
    }
}
