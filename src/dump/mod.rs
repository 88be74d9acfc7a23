//! pdftk metadata dumps.
//!
//! A dump is a sequence of opaque `Key: value` lines with fixed-width
//! bookmark blocks interleaved anywhere. [`MetadataDocument`] separates the
//! bookmarks from everything else so that the rest can be written back
//! untouched:
//!
//! - lines up to and including the first `NumberOfPages:` line form the
//!   preamble,
//! - later non-bookmark lines form the postamble,
//! - bookmark blocks are decoded into [`BookmarkRecord`]s in dump order.
//!
//! # Example
//!
//! ```
//! use pdfmarks::MetadataDocument;
//!
//! let dump = "\
//! InfoBegin
//! InfoKey: Title
//! InfoValue: Example
//! NumberOfPages: 3
//! BookmarkBegin
//! BookmarkTitle: Chapter 1
//! BookmarkLevel: 1
//! BookmarkPageNumber: 1
//! PageMediaBegin
//! ";
//!
//! let doc = MetadataDocument::parse(dump).unwrap();
//! assert_eq!(doc.preamble.len(), 4);
//! assert_eq!(doc.bookmarks[0].title, "Chapter 1");
//! assert_eq!(doc.postamble, vec!["PageMediaBegin"]);
//! assert_eq!(doc.render(), dump);
//! ```

pub mod record;

pub use record::BookmarkRecord;

use crate::error::DecodeError;

/// Substring marking the end of the preamble.
pub const PAGE_COUNT_MARKER: &str = "NumberOfPages:";

/// A metadata dump split into bookmarks and the surrounding opaque lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataDocument {
    pub preamble: Vec<String>,
    pub bookmarks: Vec<BookmarkRecord>,
    pub postamble: Vec<String>,
}

impl MetadataDocument {
    /// Parse dump text. Lines end in `\n`; a trailing `\r` is dropped.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        Self::split(text.lines())
    }

    /// Split a sequence of dump lines in a single forward pass.
    ///
    /// Fails on the first malformed bookmark block; no partial document is
    /// returned.
    pub fn split<'a, I>(lines: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut doc = Self::default();
        let mut seen_page_marker = false;
        let mut lines = lines.into_iter().enumerate().map(|(i, l)| (i + 1, l));

        while let Some((line_no, line)) = lines.next() {
            if line == record::BEGIN {
                let mut block = [""; 3];
                for slot in &mut block {
                    let (_, next) = lines
                        .next()
                        .ok_or(DecodeError::TruncatedRecord { line: line_no })?;
                    *slot = next;
                }
                doc.bookmarks
                    .push(BookmarkRecord::decode(block, line_no + 1)?);
                continue;
            }

            if seen_page_marker {
                doc.postamble.push(line.to_string());
            } else {
                doc.preamble.push(line.to_string());
            }

            if line.contains(PAGE_COUNT_MARKER) {
                seen_page_marker = true;
            }
        }

        Ok(doc)
    }

    /// Replace the bookmark sequence, keeping the surrounding lines.
    pub fn with_bookmarks(mut self, bookmarks: Vec<BookmarkRecord>) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    /// Page count from the `NumberOfPages:` line, if present and numeric.
    pub fn number_of_pages(&self) -> Option<u32> {
        self.preamble
            .iter()
            .chain(&self.postamble)
            .find_map(|line| line.split_once(PAGE_COUNT_MARKER))
            .and_then(|(_, value)| value.trim().parse().ok())
    }

    /// Render the preamble, every bookmark block, then the postamble.
    ///
    /// Bookmark levels are written exactly as stored; callers serializing an
    /// edited outline should pass its records through [`with_bookmarks`].
    ///
    /// [`with_bookmarks`]: MetadataDocument::with_bookmarks
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        for bookmark in &self.bookmarks {
            bookmark.write_to(&mut out);
        }
        for line in &self.postamble {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
