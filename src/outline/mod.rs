//! Editable bookmark outline.
//!
//! The outline is an ordered tree of bookmarks stored in an arena:
//! - Nodes are addressed by [`NodeId`] handles that survive edits
//! - [`NodePath`] gives the root-relative position used for display and input
//! - A synthetic root (never serialized) holds the top-level bookmarks
//! - Levels are not stored; a node's level is its depth
//!
//! Outlines are built from flat dump records ([`Outline::from_records`]),
//! edited in place (see [`edit`]) and flattened back
//! ([`Outline::to_records`]).
//!
//! # Example
//!
//! ```
//! use pdfmarks::outline::{NodeId, Outline};
//!
//! let mut outline = Outline::new();
//! let intro = outline.insert_with(NodeId::ROOT, 0, "Introduction", 1).unwrap().node;
//! outline.insert_with(intro, 0, "Motivation", 2).unwrap();
//!
//! let records = outline.to_records();
//! assert_eq!(records[1].title, "Motivation");
//! assert_eq!(records[1].level, 2);
//! ```

mod build;
pub mod edit;
mod node;
mod serialize;

pub use edit::{ChangeKind, Mutation};
pub use node::{Node, NodeId, NodePath};

/// An ordered tree of bookmarks.
///
/// Uses a parent-pointer / first-child / next-sibling representation. Deleted
/// nodes leave a vacant slot so that surviving handles keep their meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// All slots (index 0 is always the root; `None` marks a deleted node).
    nodes: Vec<Option<Node>>,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    /// Create an empty outline with only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::root())],
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a live node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Whether `id` names a live node (the root included).
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of bookmarks, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.node(NodeId::ROOT)
            .is_none_or(|root| root.first_child.is_none())
    }

    /// Allocate a detached node and return its ID.
    pub(crate) fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Append a detached node as the last child of `parent`.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.child_count(parent);
        self.attach(parent, len, child);
    }

    /// Link a detached node into `parent`'s child list at `index`.
    ///
    /// Callers validate `index <= child_count(parent)`.
    pub(crate) fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let next = if index == 0 {
            let first = self.node(parent).and_then(|p| p.first_child);
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.first_child = Some(child);
            }
            first
        } else {
            let Some(prev) = self.nth_child(parent, index - 1) else {
                return;
            };
            let next = self.node(prev).and_then(|p| p.next_sibling);
            if let Some(prev_node) = self.node_mut(prev) {
                prev_node.next_sibling = Some(child);
            }
            next
        };

        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
            child_node.next_sibling = next;
        }
    }

    /// Unlink a node from its parent's child list. Its subtree stays intact.
    pub(crate) fn detach(&mut self, child: NodeId) {
        let Some(node) = self.node(child) else {
            return;
        };
        let next = node.next_sibling;
        let Some(parent) = node.parent else {
            return;
        };

        if self.node(parent).and_then(|p| p.first_child) == Some(child) {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.first_child = next;
            }
        } else {
            let prev = self
                .children(parent)
                .find(|&id| self.node(id).and_then(|n| n.next_sibling) == Some(child));
            if let Some(prev) = prev
                && let Some(prev_node) = self.node_mut(prev)
            {
                prev_node.next_sibling = next;
            }
        }

        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = None;
            child_node.next_sibling = None;
        }
    }

    /// Vacate the slots of a detached subtree. Returns the number of nodes freed.
    pub(crate) fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut freed = 0;
        while let Some(current) = stack.pop() {
            stack.extend(self.children(current));
            if let Some(slot) = self.nodes.get_mut(current.0 as usize)
                && slot.take().is_some()
            {
                freed += 1;
            }
        }
        freed
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            outline: self,
            current: self.node(parent).and_then(|n| n.first_child),
        }
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).count()
    }

    pub fn nth_child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).nth(index)
    }

    /// Parent of a node (None for the root and unknown handles).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Ancestors of a node, nearest first, ending with the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Depth of a node (root children = 1), which is also its serialized level.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.node(id)?;
        Some(self.ancestors(id).count())
    }

    /// Whether `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        ancestor == id || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Resolve a root-relative path to a handle.
    pub fn resolve(&self, path: &NodePath) -> Option<NodeId> {
        path.0
            .iter()
            .try_fold(NodeId::ROOT, |parent, &index| self.nth_child(parent, index))
    }

    /// Compute the current root-relative path of a live node.
    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        self.node(id)?;
        let mut indices = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let index = self.children(parent).position(|c| c == current)?;
            indices.push(index);
            current = parent;
        }
        indices.reverse();
        Some(NodePath(indices))
    }

    /// Iterate over all bookmarks in display order (pre-order, depth-first),
    /// yielding each node with its depth. The root is not yielded.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        let mut stack: Vec<(NodeId, usize)> =
            self.children(NodeId::ROOT).map(|id| (id, 1)).collect();
        stack.reverse();
        DfsIter {
            outline: self,
            stack,
        }
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    outline: &'a Outline,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.outline.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over all bookmarks, with depth.
pub struct DfsIter<'a> {
    outline: &'a Outline,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (current, depth) = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<(NodeId, usize)> = self
            .outline
            .children(current)
            .map(|id| (id, depth + 1))
            .collect();
        children.reverse();
        self.stack.extend(children);

        Some((current, depth))
    }
}
