use super::position::CursorPosition;
use crate::surface::{CaretTransaction, EditableSurface};

/// What happened when carets were handed to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorApplication {
    /// This many carets were placed in one transaction
    Applied(usize),
    /// There were no positions to place
    NothingToApply,
    /// No editable surface was available, e.g. the document was closed
    SurfaceUnavailable,
}

/// Place one caret per position on `surface` as a single transaction.
pub fn apply_cursor_positions<S>(
    surface: Option<&mut S>,
    positions: impl IntoIterator<Item = CursorPosition>,
) -> CursorApplication
where
    S: EditableSurface + ?Sized,
{
    let Some(surface) = surface else {
        log::debug!("no active editor, skipping caret placement");
        return CursorApplication::SurfaceUnavailable;
    };

    let transaction: CaretTransaction = positions.into_iter().collect();
    if transaction.selections.is_empty() {
        return CursorApplication::NothingToApply;
    }

    let count = transaction.selections.len();
    surface.focus();
    surface.apply_transaction(transaction);
    CursorApplication::Applied(count)
}
