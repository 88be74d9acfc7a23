//! Flattening an outline back into dump records.

use super::Outline;
use crate::dump::BookmarkRecord;

impl Outline {
    /// Flatten to records in display order.
    ///
    /// Each record's level is the node's depth at the time of the call, so
    /// structural edits never need a renumbering pass.
    pub fn to_records(&self) -> Vec<BookmarkRecord> {
        self.iter_dfs()
            .filter_map(|(id, depth)| {
                let node = self.node(id)?;
                Some(BookmarkRecord::new(
                    node.title.clone(),
                    depth as u32,
                    node.page,
                ))
            })
            .collect()
    }
}
