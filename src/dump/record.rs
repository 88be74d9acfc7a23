//! Bookmark record codec.
//!
//! A bookmark in a pdftk dump is a fixed-width block:
//!
//! ```text
//! BookmarkBegin
//! BookmarkTitle: Chapter 1
//! BookmarkLevel: 1
//! BookmarkPageNumber: 5
//! ```

use crate::error::DecodeError;

/// Marker line that opens every bookmark block.
pub const BEGIN: &str = "BookmarkBegin";
pub const TITLE_KEY: &str = "BookmarkTitle";
pub const LEVEL_KEY: &str = "BookmarkLevel";
pub const PAGE_KEY: &str = "BookmarkPageNumber";

/// One flat bookmark entry as it appears in the dump.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookmarkRecord {
    pub title: String,
    /// 1-based nesting depth.
    pub level: u32,
    pub page: u32,
}

impl BookmarkRecord {
    pub fn new(title: impl Into<String>, level: u32, page: u32) -> Self {
        Self {
            title: title.into(),
            level,
            page,
        }
    }

    /// Decode the three lines following a `BookmarkBegin` marker.
    ///
    /// `first_line` is the 1-based line number of `lines[0]` in the dump and
    /// is only used for error reporting.
    pub fn decode(lines: [&str; 3], first_line: usize) -> Result<Self, DecodeError> {
        let [title_line, level_line, page_line] = lines;

        let title = field(title_line, TITLE_KEY, first_line)?.to_string();
        let level = integer(level_line, LEVEL_KEY, first_line + 1)?;
        let page = integer(page_line, PAGE_KEY, first_line + 2)?;

        if level == 0 {
            return Err(DecodeError::InvalidLevel {
                line: first_line + 1,
            });
        }

        Ok(Self { title, level, page })
    }

    /// Encode as the four dump lines, marker included.
    pub fn encode(&self) -> [String; 4] {
        [
            BEGIN.to_string(),
            format!("{TITLE_KEY}: {}", self.title),
            format!("{LEVEL_KEY}: {}", self.level),
            format!("{PAGE_KEY}: {}", self.page),
        ]
    }

    /// Append the encoded block to `out`, one `\n`-terminated line each.
    pub fn write_to(&self, out: &mut String) {
        for line in self.encode() {
            out.push_str(&line);
            out.push('\n');
        }
    }
}

/// Value of a `Key: value` line. Only the first colon-space is a delimiter.
fn field<'a>(line: &'a str, key: &'static str, line_no: usize) -> Result<&'a str, DecodeError> {
    let missing = || DecodeError::MissingField { line: line_no, key };

    let rest = line.strip_prefix(key).ok_or_else(missing)?;
    let rest = rest.strip_prefix(':').ok_or_else(missing)?;
    match rest.strip_prefix(' ') {
        Some(value) => Ok(value),
        // A bare `Key:` carries an empty value.
        None if rest.is_empty() => Ok(rest),
        None => Err(missing()),
    }
}

fn integer(line: &str, key: &'static str, line_no: usize) -> Result<u32, DecodeError> {
    let value = field(line, key, line_no)?;
    value
        .trim()
        .parse()
        .map_err(|_| DecodeError::InvalidInteger {
            line: line_no,
            key,
            value: value.to_string(),
        })
}
