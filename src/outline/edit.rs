//! Outline mutations.
//!
//! Every mutation validates its arguments before touching the tree, so a
//! rejected call leaves the outline exactly as it was. A successful call
//! returns a [`Mutation`] naming the affected node, which front ends can use
//! to refresh their view.

use std::fmt;

use super::{Node, NodeId, Outline};
use crate::error::EditError;

/// Title given to bookmarks created by [`Outline::insert`].
pub const PLACEHOLDER_TITLE: &str = "New bookmark";

/// What a successful mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Renamed,
    PageChanged,
    Inserted,
    /// The node and its descendants were removed; `removed` counts all of them.
    Deleted {
        removed: usize,
    },
    Moved,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Renamed => f.write_str("renamed"),
            ChangeKind::PageChanged => f.write_str("changed page of"),
            ChangeKind::Inserted => f.write_str("inserted"),
            ChangeKind::Deleted { removed: 1 } => f.write_str("deleted 1 bookmark"),
            ChangeKind::Deleted { removed } => write!(f, "deleted {removed} bookmarks"),
            ChangeKind::Moved => f.write_str("moved"),
        }
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// The node that was changed. For deletions the handle is no longer live.
    pub node: NodeId,
    pub kind: ChangeKind,
}

impl Mutation {
    fn new(node: NodeId, kind: ChangeKind) -> Self {
        Self { node, kind }
    }
}

impl Outline {
    /// Replace a bookmark's title.
    pub fn rename(&mut self, id: NodeId, title: impl Into<String>) -> Result<Mutation, EditError> {
        self.bookmark_mut(id)?.title = title.into();
        Ok(Mutation::new(id, ChangeKind::Renamed))
    }

    /// Set a bookmark's target page from user input.
    ///
    /// The text must be a non-negative integer (surrounding whitespace is
    /// ignored); anything else is rejected without modifying the node.
    pub fn set_page(&mut self, id: NodeId, page: &str) -> Result<Mutation, EditError> {
        self.bookmark(id)?;
        let page = page
            .trim()
            .parse()
            .map_err(|_| EditError::InvalidPage(page.to_string()))?;
        self.set_page_number(id, page)
    }

    pub fn set_page_number(&mut self, id: NodeId, page: u32) -> Result<Mutation, EditError> {
        self.bookmark_mut(id)?.page = page;
        Ok(Mutation::new(id, ChangeKind::PageChanged))
    }

    /// Insert a placeholder bookmark (page 1) at `index` among `parent`'s children.
    pub fn insert(&mut self, parent: NodeId, index: usize) -> Result<Mutation, EditError> {
        self.insert_with(parent, index, PLACEHOLDER_TITLE, 1)
    }

    /// Insert a bookmark at `index` among `parent`'s children.
    ///
    /// `parent` may be [`NodeId::ROOT`]; `index` must be in `0..=child_count`.
    pub fn insert_with(
        &mut self,
        parent: NodeId,
        index: usize,
        title: impl Into<String>,
        page: u32,
    ) -> Result<Mutation, EditError> {
        if !self.contains(parent) {
            return Err(EditError::UnknownNode(parent));
        }
        let len = self.child_count(parent);
        if index > len {
            return Err(EditError::IndexOutOfRange { index, len });
        }

        let id = self.alloc_node(Node::new(title, page));
        self.attach(parent, index, id);
        Ok(Mutation::new(id, ChangeKind::Inserted))
    }

    /// Remove a bookmark together with all of its descendants.
    ///
    /// Handles to removed nodes stop resolving; no child is re-parented.
    pub fn delete(&mut self, id: NodeId) -> Result<Mutation, EditError> {
        self.bookmark(id)?;
        self.detach(id);
        let removed = self.free_subtree(id);
        Ok(Mutation::new(id, ChangeKind::Deleted { removed }))
    }

    /// Move a bookmark (with its subtree) to `new_index` under `new_parent`.
    ///
    /// `new_index` addresses the destination list with the node already
    /// removed from its old position, so moving within the same parent uses
    /// the final position. Moving a node under itself or a descendant fails
    /// with [`EditError::Cycle`].
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        new_index: usize,
    ) -> Result<Mutation, EditError> {
        self.bookmark(id)?;
        if !self.contains(new_parent) {
            return Err(EditError::UnknownNode(new_parent));
        }
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(EditError::Cycle);
        }

        let mut len = self.child_count(new_parent);
        if self.parent(id) == Some(new_parent) {
            len -= 1;
        }
        if new_index > len {
            return Err(EditError::IndexOutOfRange {
                index: new_index,
                len,
            });
        }

        self.detach(id);
        self.attach(new_parent, new_index, id);
        Ok(Mutation::new(id, ChangeKind::Moved))
    }

    /// A live, non-root node.
    fn bookmark(&self, id: NodeId) -> Result<&Node, EditError> {
        if id == NodeId::ROOT {
            return Err(EditError::RootNotEditable);
        }
        self.node(id).ok_or(EditError::UnknownNode(id))
    }

    fn bookmark_mut(&mut self, id: NodeId) -> Result<&mut Node, EditError> {
        if id == NodeId::ROOT {
            return Err(EditError::RootNotEditable);
        }
        self.node_mut(id).ok_or(EditError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::BookmarkRecord;
    use crate::outline::NodePath;

    /// A(1) [B(2) [C(3)], D(4)], E(5)
    fn sample() -> Outline {
        Outline::from_records(&[
            BookmarkRecord::new("A", 1, 1),
            BookmarkRecord::new("B", 2, 2),
            BookmarkRecord::new("C", 3, 3),
            BookmarkRecord::new("D", 2, 4),
            BookmarkRecord::new("E", 1, 5),
        ])
    }

    fn at(outline: &Outline, path: &str) -> NodeId {
        outline.resolve(&path.parse().unwrap()).unwrap()
    }

    fn flat(outline: &Outline) -> Vec<(String, u32)> {
        outline
            .to_records()
            .into_iter()
            .map(|r| (r.title, r.level))
            .collect()
    }

    fn expect(items: &[(&str, u32)]) -> Vec<(String, u32)> {
        items.iter().map(|&(t, l)| (t.to_string(), l)).collect()
    }

    #[test]
    fn rename_changes_only_title() {
        let mut outline = sample();
        let b = at(&outline, "1.1");
        let result = outline.rename(b, "Renamed").unwrap();
        assert_eq!(result, Mutation::new(b, ChangeKind::Renamed));
        assert_eq!(outline.node(b).unwrap().title, "Renamed");
        assert_eq!(outline.path_of(b), Some(NodePath(vec![0, 0])));
    }

    #[test]
    fn set_page_accepts_numeric_text() {
        let mut outline = sample();
        let e = at(&outline, "2");
        let result = outline.set_page(e, " 17 ").unwrap();
        assert_eq!(result.kind, ChangeKind::PageChanged);
        assert_eq!(outline.node(e).unwrap().page, 17);
    }

    #[test]
    fn set_page_rejects_non_numeric_text() {
        let mut outline = sample();
        let before = outline.clone();
        let e = at(&outline, "2");
        for bad in ["", "abc", "-3", "1.5", "4294967296"] {
            assert_eq!(
                outline.set_page(e, bad),
                Err(EditError::InvalidPage(bad.to_string()))
            );
        }
        assert_eq!(outline, before);
    }

    #[test]
    fn insert_placeholder_at_position() {
        let mut outline = sample();
        let a = at(&outline, "1");
        let result = outline.insert(a, 1).unwrap();
        assert_eq!(result.kind, ChangeKind::Inserted);

        let node = outline.node(result.node).unwrap();
        assert_eq!(node.title, PLACEHOLDER_TITLE);
        assert_eq!(node.page, 1);
        assert_eq!(outline.path_of(result.node), Some(NodePath(vec![0, 1])));
        assert_eq!(
            flat(&outline),
            expect(&[
                ("A", 1),
                ("B", 2),
                ("C", 3),
                (PLACEHOLDER_TITLE, 2),
                ("D", 2),
                ("E", 1)
            ])
        );
    }

    #[test]
    fn insert_at_end_and_into_empty_outline() {
        let mut outline = Outline::new();
        let first = outline.insert(NodeId::ROOT, 0).unwrap().node;
        let second = outline.insert_with(NodeId::ROOT, 1, "Second", 9).unwrap().node;
        let children: Vec<_> = outline.children(NodeId::ROOT).collect();
        assert_eq!(children, vec![first, second]);
    }

    #[test]
    fn insert_rejects_out_of_range_index() {
        let mut outline = sample();
        let before = outline.clone();
        let a = at(&outline, "1");
        assert_eq!(
            outline.insert(a, 3),
            Err(EditError::IndexOutOfRange { index: 3, len: 2 })
        );
        assert_eq!(outline, before);
    }

    #[test]
    fn delete_removes_whole_subtree() {
        let mut outline = sample();
        let a = at(&outline, "1");
        let b = at(&outline, "1.1");
        let c = at(&outline, "1.1.1");
        let d = at(&outline, "1.2");

        let result = outline.delete(a).unwrap();
        assert_eq!(result.kind, ChangeKind::Deleted { removed: 4 });
        assert_eq!(flat(&outline), expect(&[("E", 1)]));
        for gone in [a, b, c, d] {
            assert!(!outline.contains(gone));
            assert_eq!(outline.rename(gone, "x"), Err(EditError::UnknownNode(gone)));
        }
    }

    #[test]
    fn delete_node_with_two_descendants() {
        let mut outline = Outline::from_records(&[
            BookmarkRecord::new("P", 1, 1),
            BookmarkRecord::new("Q", 2, 2),
            BookmarkRecord::new("R", 3, 3),
            BookmarkRecord::new("S", 1, 4),
        ]);
        let p = at(&outline, "1");
        let result = outline.delete(p).unwrap();
        assert_eq!(result.kind, ChangeKind::Deleted { removed: 3 });
        assert_eq!(flat(&outline), expect(&[("S", 1)]));
    }

    #[test]
    fn handles_survive_other_edits() {
        let mut outline = sample();
        let c = at(&outline, "1.1.1");
        let e = at(&outline, "2");
        outline.delete(at(&outline, "1.2")).unwrap();
        outline.insert(NodeId::ROOT, 0).unwrap();
        outline.move_node(e, c, 0).unwrap();

        assert_eq!(outline.node(c).unwrap().title, "C");
        assert_eq!(outline.path_of(c), Some(NodePath(vec![1, 0, 0])));
        assert_eq!(outline.path_of(e), Some(NodePath(vec![1, 0, 0, 0])));
        assert_eq!(outline.depth(e), Some(4));
    }

    #[test]
    fn move_reparents_and_recomputes_levels() {
        let mut outline = sample();
        let e = at(&outline, "2");
        let b = at(&outline, "1.1");
        let result = outline.move_node(e, b, 1).unwrap();
        assert_eq!(result, Mutation::new(e, ChangeKind::Moved));
        assert_eq!(
            flat(&outline),
            expect(&[("A", 1), ("B", 2), ("C", 3), ("E", 3), ("D", 2)])
        );
    }

    #[test]
    fn move_to_top_level() {
        let mut outline = sample();
        let c = at(&outline, "1.1.1");
        outline.move_node(c, NodeId::ROOT, 0).unwrap();
        assert_eq!(
            flat(&outline),
            expect(&[("C", 1), ("A", 1), ("B", 2), ("D", 2), ("E", 1)])
        );
    }

    #[test]
    fn reorder_within_same_parent() {
        let mut outline = sample();
        let a = at(&outline, "1");
        // Two top-level nodes; A's final index may be 1 but not 2.
        assert_eq!(
            outline.move_node(a, NodeId::ROOT, 2),
            Err(EditError::IndexOutOfRange { index: 2, len: 1 })
        );
        outline.move_node(a, NodeId::ROOT, 1).unwrap();
        assert_eq!(
            flat(&outline),
            expect(&[("E", 1), ("A", 1), ("B", 2), ("C", 3), ("D", 2)])
        );
    }

    #[test]
    fn move_in_place_is_a_no_op() {
        let mut outline = sample();
        let before = flat(&outline);
        let d = at(&outline, "1.2");
        let a = at(&outline, "1");
        outline.move_node(d, a, 1).unwrap();
        assert_eq!(flat(&outline), before);
    }

    #[test]
    fn move_under_descendant_is_rejected() {
        let mut outline = sample();
        let before = outline.clone();
        let a = at(&outline, "1");
        let c = at(&outline, "1.1.1");
        assert_eq!(outline.move_node(a, c, 0), Err(EditError::Cycle));
        assert_eq!(outline.move_node(a, a, 0), Err(EditError::Cycle));
        assert_eq!(outline, before);
    }

    #[test]
    fn root_is_not_editable() {
        let mut outline = sample();
        assert_eq!(
            outline.rename(NodeId::ROOT, "x"),
            Err(EditError::RootNotEditable)
        );
        assert_eq!(outline.delete(NodeId::ROOT), Err(EditError::RootNotEditable));
        assert_eq!(
            outline.move_node(NodeId::ROOT, NodeId::ROOT, 0),
            Err(EditError::RootNotEditable)
        );
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut outline = sample();
        let ghost = NodeId(999);
        assert_eq!(outline.insert(ghost, 0), Err(EditError::UnknownNode(ghost)));
        let a = at(&outline, "1");
        assert_eq!(
            outline.move_node(a, ghost, 0),
            Err(EditError::UnknownNode(ghost))
        );
    }

    #[test]
    fn change_kinds_read_as_plain_messages() {
        assert_eq!(ChangeKind::Renamed.to_string(), "renamed");
        assert_eq!(ChangeKind::PageChanged.to_string(), "changed page of");
        assert_eq!(ChangeKind::Deleted { removed: 1 }.to_string(), "deleted 1 bookmark");
        assert_eq!(ChangeKind::Deleted { removed: 3 }.to_string(), "deleted 3 bookmarks");
        assert!(!ChangeKind::Moved.to_string().contains('{'));
    }
}
