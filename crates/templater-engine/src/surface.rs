//! Host editor capabilities.
//!
//! The engine never looks up the active view on its own. Callers hand it a
//! [`Workspace`], and anything that needs the focused editor asks that
//! workspace for it and copes with there being none.

use async_trait::async_trait;

use crate::cursor::CursorPosition;
use crate::models::DocumentRef;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Failed to save {document}: {reason}")]
    SaveFailed {
        document: DocumentRef,
        reason: String,
    },
    #[error("Failed to open {0}")]
    OpenFailed(DocumentRef),
}

/// A zero-width caret, `to` is always `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretSelection {
    pub from: CursorPosition,
    pub to: Option<CursorPosition>,
}

impl CaretSelection {
    pub fn caret(at: CursorPosition) -> Self {
        Self { from: at, to: None }
    }
}

/// A set of selections applied to an editor in one step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaretTransaction {
    pub selections: Vec<CaretSelection>,
}

impl FromIterator<CursorPosition> for CaretTransaction {
    fn from_iter<I: IntoIterator<Item = CursorPosition>>(iter: I) -> Self {
        Self {
            selections: iter.into_iter().map(CaretSelection::caret).collect(),
        }
    }
}

/// An open, editable view of a document
#[async_trait]
pub trait EditableSurface: Send {
    /// The document shown in this view
    fn document(&self) -> &DocumentRef;

    /// Flush pending edits to storage.
    async fn save(&mut self) -> Result<(), SurfaceError>;

    /// Replace the current selection (or insert at the caret) with `text`.
    fn replace_selection(&mut self, text: &str);

    /// Show `content` as the document's text without marking the view dirty.
    ///
    /// Called after the engine rewrote the document in storage, so a later
    /// `save` must not bring back the old text.
    fn set_content(&mut self, content: &str);

    fn focus(&mut self);

    /// Apply all selections atomically, replacing the existing ones.
    fn apply_transaction(&mut self, transaction: CaretTransaction);
}

/// The host's set of open views
#[async_trait]
pub trait Workspace: Send {
    type Surface: EditableSurface;

    /// The focused editable view, if there is one.
    fn active_surface(&mut self) -> Option<&mut Self::Surface>;

    /// Open `document` in the active pane and focus it.
    async fn open(&mut self, document: &DocumentRef) -> Result<&mut Self::Surface, SurfaceError>;
}

/// A read-only rendered view whose displayed text can be swapped out
pub trait PreviewSurface {
    fn text(&self) -> &str;

    fn set_text(&mut self, text: String);
}
