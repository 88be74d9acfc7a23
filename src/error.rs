//! Error types for pdfmarks operations.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::outline::NodeId;

/// Errors raised while decoding a metadata dump.
///
/// Line numbers are 1-based positions in the dump text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line {line}: bookmark block is truncated")]
    TruncatedRecord { line: usize },

    #[error("line {line}: expected `{key}` field")]
    MissingField { line: usize, key: &'static str },

    #[error("line {line}: `{key}` value {value:?} is not a non-negative integer")]
    InvalidInteger {
        line: usize,
        key: &'static str,
        value: String,
    },

    #[error("line {line}: bookmark level must be at least 1")]
    InvalidLevel { line: usize },
}

/// Errors raised by outline mutations. The outline is unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("invalid page number {0:?}")]
    InvalidPage(String),

    #[error("index {index} out of range (0..={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("a bookmark cannot be moved under itself or one of its descendants")]
    Cycle,

    #[error("no bookmark with handle {0}")]
    UnknownNode(NodeId),

    #[error("the outline root cannot be edited")]
    RootNotEditable,

    #[error("invalid bookmark path {0:?}")]
    InvalidPath(String),
}

/// Errors raised by the pdftk subprocess.
#[derive(Error, Debug)]
pub enum PdftkError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("pdftk exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("pdftk closed its input before the metadata was written")]
    BrokenPipe,

    #[error("cannot write {0} over itself; use save instead")]
    SameFile(PathBuf),
}

/// Errors that can occur while loading, editing or saving bookmarks.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(String),

    #[error("Malformed metadata: {0}")]
    Decode(#[from] DecodeError),

    #[error("Rejected edit: {0}")]
    Edit(#[from] EditError),

    #[error(transparent)]
    Pdftk(#[from] PdftkError),
}

pub type Result<T> = std::result::Result<T, Error>;
