use std::collections::VecDeque;

use log::debug;

use crate::SceneError;
use crate::command::ReversibleCommand;
use crate::scene::Scene;

pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Undo and redo stacks of applied [`ReversibleCommand`]s.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    undo_stack: VecDeque<ReversibleCommand>,
    redo_stack: Vec<ReversibleCommand>,
    max_depth: usize,
}

impl CommandHistory {
    pub fn new(max_depth: usize) -> Self {
        CommandHistory {
            undo_stack: VecDeque::new(),
            redo_stack: vec![],
            max_depth: max_depth.max(1),
        }
    }

    /// Records a command which has already been applied to the scene.
    /// Undone commands can no longer be redone, the nodes they would add are removed from `scene`.
    pub fn push(&mut self, cmd: ReversibleCommand, scene: &mut Scene) {
        self.undo_stack.push_back(cmd);
        for undone in self.redo_stack.drain(..) {
            undone.discard(scene);
        }
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Reverts the last applied command. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> Result<bool, SceneError> {
        let Some(cmd) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        match cmd.undo(scene) {
            Ok(()) => {
                debug!("[CMD] undid command of {} operations", cmd.len());
                self.redo_stack.push(cmd);
                Ok(true)
            }
            Err(e) => {
                self.undo_stack.push_back(cmd);
                Err(e)
            }
        }
    }

    /// Reapplies the last undone command. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> Result<bool, SceneError> {
        let Some(cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match cmd.redo(scene) {
            Ok(()) => {
                debug!("[CMD] redid command of {} operations", cmd.len());
                self.undo_stack.push_back(cmd);
                Ok(true)
            }
            Err(e) => {
                self.redo_stack.push(cmd);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        CommandHistory::new(DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Operation;
    use crate::scene::SceneNode;

    fn add_command(scene: &mut Scene) -> ReversibleCommand {
        let node = scene.insert_detached(SceneNode::group("g"));
        let mut cmd = ReversibleCommand::new();
        cmd.push(Operation::AddNode {
            node,
            parent: scene.root(),
        });
        cmd.redo(scene).unwrap();
        cmd
    }

    #[test]
    fn undo_redo_cycle() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::default();
        assert!(!history.can_undo());

        let cmd = add_command(&mut scene);
        history.push(cmd, &mut scene);
        assert_eq!(scene.reachable().len(), 1);

        assert_eq!(history.undo(&mut scene), Ok(true));
        assert!(scene.reachable().is_empty());
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut scene), Ok(true));
        assert_eq!(scene.reachable().len(), 1);
        assert_eq!(history.redo(&mut scene), Ok(false));
    }

    #[test]
    fn depth_is_bounded() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new(2);
        for _ in 0..3 {
            let cmd = add_command(&mut scene);
            history.push(cmd, &mut scene);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(&mut scene), Ok(true));
        assert_eq!(history.undo(&mut scene), Ok(true));
        assert_eq!(history.undo(&mut scene), Ok(false));
        //the oldest command fell off the stack
        assert_eq!(scene.reachable().len(), 1);
    }

    #[test]
    fn new_command_discards_undone_nodes() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::default();
        let cmd = add_command(&mut scene);
        history.push(cmd, &mut scene);
        assert_eq!(history.undo(&mut scene), Ok(true));
        assert_eq!(scene.n_nodes(), 2);

        let cmd = add_command(&mut scene);
        history.push(cmd, &mut scene);
        assert!(!history.can_redo());
        assert_eq!(scene.n_nodes(), 2);
        assert_eq!(scene.reachable().len(), 1);
    }
}
