//! Editing sessions.
//!
//! A [`Session`] owns one loaded PDF's metadata and its outline. The outline
//! is the only mutable state; the rest of the dump is kept verbatim and
//! reassembled around the serialized outline when saving.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dump::MetadataDocument;
use crate::error::{EditError, PdftkError, Result};
use crate::outline::{Mutation, Outline};
use crate::pdftk::Pdftk;

/// A loaded document being edited.
#[derive(Debug, Clone)]
pub struct Session {
    source: PathBuf,
    document: MetadataDocument,
    outline: Outline,
    dirty: bool,
}

impl Session {
    /// Dump `path` through pdftk and build its outline.
    pub fn open(pdftk: &Pdftk, path: impl Into<PathBuf>) -> Result<Self> {
        let source = path.into();
        let text = pdftk.dump(&source)?;
        let session = Self::from_dump(source, &text)?;
        info!(
            path = %session.source.display(),
            bookmarks = session.outline.len(),
            "loaded outline"
        );
        Ok(session)
    }

    /// Build a session from dump text already obtained for `source`.
    pub fn from_dump(source: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let document = MetadataDocument::parse(text)?;
        let outline = Outline::from_records(&document.bookmarks);
        Ok(Self {
            source: source.into(),
            document,
            outline,
            dirty: false,
        })
    }

    /// Discard all edits and load the source file again.
    pub fn reload(&mut self, pdftk: &Pdftk) -> Result<()> {
        *self = Self::open(pdftk, self.source.clone())?;
        Ok(())
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The metadata as loaded (bookmarks as originally dumped).
    pub fn original(&self) -> &MetadataDocument {
        &self.document
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Mutable access to the outline. Marks the session as modified.
    pub fn outline_mut(&mut self) -> &mut Outline {
        self.dirty = true;
        &mut self.outline
    }

    /// Run one outline mutation, marking the session modified only on success.
    pub fn apply<F>(&mut self, edit: F) -> std::result::Result<Mutation, EditError>
    where
        F: FnOnce(&mut Outline) -> std::result::Result<Mutation, EditError>,
    {
        let mutation = edit(&mut self.outline)?;
        self.dirty = true;
        Ok(mutation)
    }

    /// Replace the whole outline, e.g. with one built from an edited dump.
    pub fn replace_outline(&mut self, outline: Outline) {
        self.outline = outline;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current metadata: the loaded document with the outline's records.
    pub fn metadata(&self) -> MetadataDocument {
        self.document
            .clone()
            .with_bookmarks(self.outline.to_records())
    }

    /// Current metadata as dump text.
    pub fn render(&self) -> String {
        self.metadata().render()
    }

    /// Write the edited document to `output`, leaving the source untouched.
    ///
    /// pdftk cannot overwrite its own input, so `output` must differ from
    /// the source; use [`Session::save`] for that.
    pub fn save_as(&mut self, pdftk: &Pdftk, output: &Path) -> Result<()> {
        if same_file(&self.source, output) {
            return Err(PdftkError::SameFile(output.to_path_buf()).into());
        }
        pdftk.update(&self.source, &self.render(), output)?;
        info!(path = %output.display(), bookmarks = self.outline.len(), "saved outline");
        self.dirty = false;
        Ok(())
    }

    /// Write the edited document back over the source file.
    ///
    /// pdftk writes to a temporary file next to the source, which then
    /// replaces the source in a single rename.
    pub fn save(&mut self, pdftk: &Pdftk) -> Result<()> {
        let dir = match self.source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".pdfmarks-")
            .suffix(".pdf")
            .tempfile_in(dir)?;

        pdftk.update(&self.source, &self.render(), temp.path())?;
        // The temp file is created owner-only; keep the source's mode instead.
        fs::set_permissions(temp.path(), fs::metadata(&self.source)?.permissions())?;
        temp.persist(&self.source).map_err(|err| err.error)?;

        info!(path = %self.source.display(), bookmarks = self.outline.len(), "saved outline");
        self.dirty = false;
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
