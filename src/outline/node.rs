//! Outline node types and addressing.

use std::fmt;
use std::str::FromStr;

use crate::error::EditError;

/// Opaque handle to a node within an [`Outline`](super::Outline).
///
/// Handles stay valid across every mutation except the deletion of the node
/// they name. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The synthetic root node ID (always 0). Never serialized.
    pub const ROOT: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bookmark in the outline tree.
///
/// Structure uses the parent-pointer / first-child / next-sibling layout.
/// The parent link is non-owning and exists for path resolution and cycle
/// checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub title: String,
    pub page: u32,
    /// Parent node (None for root and for detached nodes).
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Next sibling node.
    pub next_sibling: Option<NodeId>,
}

impl Node {
    /// Create a detached node.
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            page,
            parent: None,
            first_child: None,
            next_sibling: None,
        }
    }

    pub(crate) fn root() -> Self {
        Self::new(String::new(), 0)
    }
}

/// Root-relative position of a node: the child index taken at each level.
///
/// Indices are 0-based internally. The textual form is 1-based and
/// dot-separated, matching how outlines are numbered on screen: `2.1` is the
/// first child of the second top-level bookmark. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth of the addressed node (root children have depth 1).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path to the parent and the index within it, or None for the root.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((NodePath(parent.to_vec()), *last))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("root");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index + 1)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = EditError;

    /// Parse `root` (or an empty string) or a 1-based dotted path like `3.1.2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }

        s.split('.')
            .map(|part| match part.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n - 1),
                _ => Err(EditError::InvalidPath(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NodePath)
    }
}
