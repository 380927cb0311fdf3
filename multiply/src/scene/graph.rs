use itertools::Itertools;
use plater::geometry::DTransformation;
use slotmap::SlotMap;

use crate::SceneError;
use crate::scene::{NodeKey, NodeKind, SceneNode};

/// Tree of [`SceneNode`]s hanging from a single root.
///
/// Nodes can exist in the scene's storage without being attached to the tree.
/// Such detached nodes are invisible to every traversal starting at the root,
/// which allows clones to be staged before they are committed.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root", NodeKind::Root));
        Scene { nodes, root }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn node(&self, key: NodeKey) -> Result<&SceneNode, SceneError> {
        self.nodes.get(key).ok_or(SceneError::InvalidHandle(key))
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(key).ok_or(SceneError::InvalidHandle(key))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of nodes in storage, detached ones included
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts `node` and attaches it as last child of `parent`.
    pub fn add_node(&mut self, node: SceneNode, parent: NodeKey) -> Result<NodeKey, SceneError> {
        self.node(parent)?;
        let key = self.insert_detached(node);
        self.attach(key, parent)?;
        Ok(key)
    }

    /// Inserts `node` into storage without attaching it to the tree.
    pub fn insert_detached(&mut self, mut node: SceneNode) -> NodeKey {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Attaches the detached `node` as last child of `parent`.
    pub fn attach(&mut self, node: NodeKey, parent: NodeKey) -> Result<(), SceneError> {
        let invalid = |reason: &str| SceneError::InvalidAttach {
            node,
            parent,
            reason: reason.to_string(),
        };
        if node == self.root {
            return Err(invalid("the root cannot be attached"));
        }
        if self.node(node)?.parent.is_some() {
            return Err(invalid("node is already attached"));
        }
        self.node(parent)?;
        if self.ancestors(parent).contains(&node) {
            return Err(invalid("parent is a descendant of the node"));
        }

        self.node_mut(node)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(node);
        Ok(())
    }

    /// Detaches `node` from its parent. The node and its subtree remain in storage.
    pub fn detach(&mut self, node: NodeKey) -> Result<(), SceneError> {
        let parent = self
            .node(node)?
            .parent
            .ok_or(SceneError::NotAttached(node))?;
        self.node_mut(parent)?.children.retain(|c| *c != node);
        self.node_mut(node)?.parent = None;
        Ok(())
    }

    /// Removes the detached `node` and its entire subtree from storage.
    pub fn remove_subtree(&mut self, node: NodeKey) -> Result<(), SceneError> {
        if self.node(node)?.parent.is_some() {
            self.detach(node)?;
        }
        for key in self.dfs(node) {
            self.nodes.remove(key);
        }
        Ok(())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// All ancestors of `key`, starting with `key` itself and ending at the top of its tree.
    pub fn ancestors(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut chain = vec![];
        let mut current = Some(key);
        while let Some(k) = current.filter(|k| self.contains(*k)) {
            chain.push(k);
            current = self.parent(k);
        }
        chain
    }

    /// Pre-order depth-first traversal of the subtree rooted at `from`, children in order.
    pub fn dfs(&self, from: NodeKey) -> Vec<NodeKey> {
        let mut order = vec![];
        let mut stack = vec![from];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get(key) {
                order.push(key);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// All nodes reachable from the root, the root excluded.
    pub fn reachable(&self) -> Vec<NodeKey> {
        self.dfs(self.root).into_iter().skip(1).collect_vec()
    }

    pub fn is_reachable(&self, key: NodeKey) -> bool {
        self.ancestors(key).last() == Some(&self.root)
    }

    pub fn set_transform(
        &mut self,
        key: NodeKey,
        transform: DTransformation,
    ) -> Result<(), SceneError> {
        self.node_mut(key)?.transform = transform;
        Ok(())
    }

    /// Transformation from the node's local space to world space: its own local transformation,
    /// followed by those of all its ancestors.
    pub fn world_transform(&self, key: NodeKey) -> Result<DTransformation, SceneError> {
        self.ancestors(key)
            .iter()
            .try_fold(DTransformation::empty(), |acc, k| -> Result<_, SceneError> {
                Ok(acc.then(&self.node(*k)?.transform))
            })
    }

    /// Walks up from `key` as long as the parent is a group, returning the topmost node reached.
    pub fn topmost_group(&self, key: NodeKey) -> Result<NodeKey, SceneError> {
        self.node(key)?;
        let mut current = key;
        while let Some(parent) = self.parent(current) {
            match self.node(parent)?.is_group() {
                true => current = parent,
                false => break,
            }
        }
        Ok(current)
    }

    /// Duplicates the subtree rooted at `source`. The copy is left detached.
    pub fn deep_clone(&mut self, source: NodeKey) -> Result<NodeKey, SceneError> {
        let copy = self.node(source)?.detached_copy();
        let clone = self.insert_detached(copy);
        for child in self.children(source).to_vec() {
            let child_clone = self.deep_clone(child)?;
            self.attach(child_clone, clone)?;
        }
        Ok(clone)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}
