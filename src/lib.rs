//! # pdfmarks
//!
//! Edit PDF bookmarks by round-tripping pdftk's metadata dump through an
//! editable outline tree.
//!
//! ## Pipeline
//!
//! - [`MetadataDocument`] splits a `dump_data_utf8` dump into bookmark
//!   records and the opaque lines around them
//! - [`Outline::from_records`] nests the flat, level-tagged records
//! - [`Outline`] mutations rename, re-page, insert, delete and move bookmarks
//! - [`Outline::to_records`] flattens the tree with levels taken from depth
//! - [`MetadataDocument::render`] reassembles the text for `update_info_utf8`
//!
//! [`Session`] and [`Pdftk`] tie these to actual files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfmarks::{NodeId, Pdftk, Session};
//!
//! let pdftk = Pdftk::default();
//! let mut session = Session::open(&pdftk, "report.pdf").unwrap();
//!
//! let first = session.outline().nth_child(NodeId::ROOT, 0).unwrap();
//! session.apply(|outline| outline.rename(first, "Summary")).unwrap();
//! session.save_as(&pdftk, "report-edited.pdf".as_ref()).unwrap();
//! ```
//!
//! ## Without pdftk
//!
//! ```
//! use pdfmarks::{MetadataDocument, NodeId, Outline};
//!
//! let dump = "NumberOfPages: 4
//! BookmarkBegin
//! BookmarkTitle: Chapter 1
//! BookmarkLevel: 1
//! BookmarkPageNumber: 1
//! BookmarkBegin
//! BookmarkTitle: Chapter 2
//! BookmarkLevel: 1
//! BookmarkPageNumber: 3
//! ";
//!
//! let doc = MetadataDocument::parse(dump).unwrap();
//! let mut outline = Outline::from_records(&doc.bookmarks);
//!
//! // Make chapter 2 a section of chapter 1.
//! let ch1 = outline.nth_child(NodeId::ROOT, 0).unwrap();
//! let ch2 = outline.nth_child(NodeId::ROOT, 1).unwrap();
//! outline.move_node(ch2, ch1, 0).unwrap();
//!
//! let text = doc.with_bookmarks(outline.to_records()).render();
//! assert!(text.contains("BookmarkTitle: Chapter 2\nBookmarkLevel: 2\n"));
//! ```

pub mod dump;
pub mod error;
pub mod outline;
pub mod pdftk;
pub mod session;
pub(crate) mod util;

pub use dump::{BookmarkRecord, MetadataDocument};
pub use error::{DecodeError, EditError, Error, PdftkError, Result};
pub use outline::{ChangeKind, Mutation, NodeId, NodePath, Outline};
pub use pdftk::Pdftk;
pub use session::Session;
