use super::applier::{CursorApplication, apply_cursor_positions};
use super::planner::plan_cursors;
use crate::io::{DocumentStore, StorageError};
use crate::surface::{EditableSurface, SurfaceError, Workspace};

#[derive(Debug, thiserror::Error)]
pub enum JumpError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of moving to the next cursor location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorJump {
    /// Markers were stripped and this many carets placed
    Placed(usize),
    /// The document had no markers left; nothing was written
    NoMarkers,
    /// No editable surface was active
    SurfaceUnavailable,
    /// The target is not the active document, so cursors were not touched
    NotActive,
}

/// Strip the next round of cursor markers from the active document and put
/// carets where they were.
///
/// The surface is saved first so the stored content matches what is shown,
/// and is handed the stripped content before the carets are applied.
pub async fn jump_to_next_cursor_location<D, W>(
    store: &D,
    workspace: &mut W,
) -> Result<CursorJump, JumpError>
where
    D: DocumentStore + ?Sized,
    W: Workspace + ?Sized,
{
    let Some(surface) = workspace.active_surface() else {
        return Ok(CursorJump::SurfaceUnavailable);
    };
    surface.save().await?;

    let document = surface.document().clone();
    let content = store.read(&document).await?;

    let Some(plan) = plan_cursors(&content) else {
        // Storage may have been rewritten by the run that led here
        surface.set_content(&content);
        return Ok(CursorJump::NoMarkers);
    };

    store.write(&document, &plan.content).await?;
    surface.set_content(&plan.content);

    match apply_cursor_positions(Some(surface), plan.into_positions()) {
        CursorApplication::Applied(count) => {
            log::info!("placed {count} cursor(s) in {document}");
            Ok(CursorJump::Placed(count))
        }
        CursorApplication::NothingToApply => Ok(CursorJump::NoMarkers),
        CursorApplication::SurfaceUnavailable => Ok(CursorJump::SurfaceUnavailable),
    }
}
