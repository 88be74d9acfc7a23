//! Outline construction from flat, level-tagged records.
//!
//! Records arrive in display order with a 1-based level each. The builder
//! remembers the most recent node seen at every level; a record attaches
//! under the nearest remembered level strictly above its own and then
//! becomes the most recent node at its level. Entries for deeper levels are
//! overwritten when those levels recur, never cleared.
//!
//! Malformed level sequences never fail. A jump from level 1 to 5 attaches
//! the deep record directly under the level-1 node, and a record with no
//! remembered shallower level becomes a top-level bookmark.

use std::collections::BTreeMap;

use super::{Node, NodeId, Outline};
use crate::dump::BookmarkRecord;

impl Outline {
    /// Build an outline from records in dump order.
    pub fn from_records(records: &[BookmarkRecord]) -> Self {
        let mut outline = Outline::new();
        let mut last_at_level: BTreeMap<u32, NodeId> = BTreeMap::new();

        for record in records {
            let parent = last_at_level
                .range(..record.level)
                .next_back()
                .map_or(NodeId::ROOT, |(_, &id)| id);

            let id = outline.alloc_node(Node::new(record.title.clone(), record.page));
            outline.append_child(parent, id);
            last_at_level.insert(record.level, id);
        }

        outline
    }
}
