pub mod cursor;
pub mod io;
pub mod models;
pub mod render;
pub mod run;
pub mod surface;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use cursor::{
    CursorApplication, CursorJump, CursorPlan, CursorPosition, plan_cursors, resolve_position,
    scan_markers,
};
pub use io::{DocumentStore, FsDocumentStore, StorageError};
pub use models::DocumentRef;
pub use render::{PassthroughRenderer, Renderer};
pub use run::{ContextMode, RunMode, RunOutcome, RunningConfig, Templater, TemplaterError};
pub use surface::{
    CaretSelection, CaretTransaction, EditableSurface, PreviewSurface, SurfaceError, Workspace,
};
