//! Arena storage for the snapshot tree

use crate::{ModelError, NodeId, Result, SourceNode};
use serde::{Deserialize, Serialize};

/// The styled tree captured from the preview.
///
/// Nodes live in a flat arena; parents own an ordered list of child ids.
/// The root is the export target or one of its ancestors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterTree {
    root: NodeId,
    nodes: Vec<SourceNode>,
}

impl PosterTree {
    /// Create a tree holding a single root node
    pub fn new(mut root: SourceNode) -> Self {
        root.id = NodeId(0);
        root.parent = None;
        root.children.clear();
        Self {
            root: NodeId(0),
            nodes: vec![root],
        }
    }

    /// Load a serialized snapshot and validate its structure
    pub fn from_json(json: &str) -> Result<Self> {
        let mut tree: PosterTree = serde_json::from_str(json)?;
        tree.link()?;
        Ok(tree)
    }

    /// Serialize the tree back to the snapshot format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, mut node: SourceNode) -> Result<NodeId> {
        if parent.index() >= self.nodes.len() {
            return Err(ModelError::NodeNotFound(parent));
        }
        let id = NodeId::new(self.nodes.len());
        node.id = id;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SourceNode> {
        self.nodes.get(id.index())
    }

    /// Like [`get`](Self::get) but with an error for unknown ids
    pub fn node(&self, id: NodeId) -> Result<&SourceNode> {
        self.get(id).ok_or(ModelError::NodeNotFound(id))
    }

    /// Children of a node in source order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SourceNode> + '_ {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(*child))
    }

    /// Ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).and_then(|n| n.parent),
        }
    }

    /// Locate the node carrying the given host element id
    pub fn find_element(&self, element_id: &str) -> Result<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.element_id.as_deref() == Some(element_id))
            .map(|n| n.id)
            .ok_or_else(|| ModelError::ElementNotFound(element_id.to_string()))
    }

    /// 1-based position of `id` among its parent's children that satisfy
    /// `filter`. Returns `None` for the root or when `id` itself is filtered out.
    pub fn position_among_siblings(
        &self,
        id: NodeId,
        filter: impl Fn(&SourceNode) -> bool,
    ) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        self.children(parent)
            .filter(|n| filter(n))
            .position(|n| n.id == id)
            .map(|p| p + 1)
    }

    /// Subtree of `id` in depth-first pre-order (including `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Assign ids and parent links after deserialization, rejecting
    /// dangling references, shared children and cycles.
    fn link(&mut self) -> Result<()> {
        let count = self.nodes.len();
        if self.root.index() >= count {
            return Err(ModelError::InvalidSnapshot(format!(
                "root {} out of range ({} nodes)",
                self.root, count
            )));
        }

        let mut parents: Vec<Option<NodeId>> = vec![None; count];
        for (index, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                if child.index() >= count {
                    return Err(ModelError::InvalidSnapshot(format!(
                        "node #{} references missing child {}",
                        index, child
                    )));
                }
                if *child == self.root || parents[child.index()].is_some() {
                    return Err(ModelError::InvalidSnapshot(format!(
                        "node {} has more than one parent",
                        child
                    )));
                }
                parents[child.index()] = Some(NodeId::new(index));
            }
        }

        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.id = NodeId::new(index);
            node.parent = parents[index];
        }

        // Every node reachable from the root must be visited exactly once;
        // a cycle detached from the root would never terminate a walk.
        let reachable = self.descendants(self.root).len();
        let attached = parents.iter().filter(|p| p.is_some()).count() + 1;
        if reachable != attached {
            return Err(ModelError::InvalidSnapshot(
                "snapshot contains nodes unreachable from the root".to_string(),
            ));
        }

        tracing::debug!(nodes = count, "snapshot linked");
        Ok(())
    }
}

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a PosterTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a SourceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
