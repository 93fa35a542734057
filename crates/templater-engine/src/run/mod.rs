//! Template runs: which document a template renders into and how the
//! output is merged with it.

pub mod orchestrator;

pub use orchestrator::{RunOutcome, Templater};

use crate::cursor::JumpError;
use crate::io::StorageError;
use crate::models::DocumentRef;
use crate::surface::SurfaceError;

/// How rendered output is merged into the target document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Render into a freshly created document
    CreateFromTemplate,
    /// Insert at the caret of the active document
    AppendToActiveDocument,
    /// Replace a document's content with its own rendered content
    OverwriteDocument,
    /// Same as `OverwriteDocument`, for the document in the active editor
    OverwriteActiveDocument,
    /// Re-render a read-only preview; nothing is persisted
    DynamicRender,
}

impl RunMode {
    pub const ALL: [RunMode; 5] = [
        RunMode::CreateFromTemplate,
        RunMode::AppendToActiveDocument,
        RunMode::OverwriteDocument,
        RunMode::OverwriteActiveDocument,
        RunMode::DynamicRender,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RunMode::CreateFromTemplate => "create",
            RunMode::AppendToActiveDocument => "append",
            RunMode::OverwriteDocument => "overwrite",
            RunMode::OverwriteActiveDocument => "overwrite-active",
            RunMode::DynamicRender => "dynamic",
        }
    }

    /// The rendering context templates are evaluated in for this mode
    pub fn context_mode(self) -> ContextMode {
        match self {
            RunMode::DynamicRender => ContextMode::DynamicReadonly,
            _ => ContextMode::UserInteractive,
        }
    }

    /// Whether the mode cannot proceed without a focused editor
    pub fn requires_active_surface(self) -> bool {
        matches!(
            self,
            RunMode::AppendToActiveDocument | RunMode::OverwriteActiveDocument
        )
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown run mode {0:?}, expected one of create, append, overwrite, overwrite-active, dynamic")]
pub struct ParseRunModeError(String);

impl std::str::FromStr for RunMode {
    type Err = ParseRunModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RunMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ParseRunModeError(s.to_string()))
    }
}

/// Context handed to the renderer alongside the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    UserInteractive,
    DynamicReadonly,
}

/// Everything a single render-and-apply cycle needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningConfig {
    pub template_source: DocumentRef,
    pub target_document: DocumentRef,
    pub run_mode: RunMode,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplaterError {
    #[error("No active editor, can't run in {mode} mode")]
    NoActiveSurface { mode: RunMode },
    #[error("Can't run in {mode} mode on {target} while {active} is the active document")]
    ActiveDocumentMismatch {
        mode: RunMode,
        target: DocumentRef,
        active: DocumentRef,
    },
    #[error("Failed to render template {template}")]
    Render {
        template: DocumentRef,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl From<JumpError> for TemplaterError {
    fn from(err: JumpError) -> Self {
        match err {
            JumpError::Storage(e) => TemplaterError::Storage(e),
            JumpError::Surface(e) => TemplaterError::Surface(e),
        }
    }
}
