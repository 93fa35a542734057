use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use crate::cursor::CursorPosition;
use crate::io::{read_file, write_file};
use crate::models::DocumentRef;
use crate::render::Renderer;
use crate::run::{ContextMode, RunningConfig};
use crate::surface::{CaretTransaction, EditableSurface, PreviewSurface, SurfaceError, Workspace};

/// Create a temporary vault directory
pub fn create_test_vault() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test markdown file with content
pub fn create_test_file(vault: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = vault.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// In-memory editor view; `save` writes the buffer back when it was edited
pub struct FakeSurface {
    document: DocumentRef,
    vault_root: Option<PathBuf>,
    pub buffer: String,
    caret: usize,
    dirty: bool,
    pub focused: bool,
    pub transactions: Vec<CaretTransaction>,
}

impl FakeSurface {
    fn new(document: DocumentRef, vault_root: Option<PathBuf>, content: &str) -> Self {
        Self {
            document,
            vault_root,
            buffer: content.to_string(),
            caret: content.len(),
            dirty: false,
            focused: false,
            transactions: Vec::new(),
        }
    }

    /// A surface that is not backed by any vault
    pub fn detached(path: &str, content: &str) -> Self {
        Self::new(DocumentRef::from(path), None, content)
    }

    /// Carets set by the most recent transaction
    pub fn carets(&self) -> Vec<CursorPosition> {
        self.transactions
            .last()
            .map(|t| t.selections.iter().map(|s| s.from).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EditableSurface for FakeSurface {
    fn document(&self) -> &DocumentRef {
        &self.document
    }

    async fn save(&mut self) -> Result<(), SurfaceError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(root) = &self.vault_root {
            write_file(self.document.relative_path(), root, &self.buffer).map_err(|e| {
                SurfaceError::SaveFailed {
                    document: self.document.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        self.dirty = false;
        Ok(())
    }

    fn replace_selection(&mut self, text: &str) {
        self.buffer.insert_str(self.caret, text);
        self.caret += text.len();
        self.dirty = true;
    }

    fn set_content(&mut self, content: &str) {
        self.buffer = content.to_string();
        self.caret = self.caret.min(self.buffer.len());
        while !self.buffer.is_char_boundary(self.caret) {
            self.caret -= 1;
        }
        self.dirty = false;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn apply_transaction(&mut self, transaction: CaretTransaction) {
        if let Some(primary) = transaction.selections.first() {
            self.caret = byte_offset(&self.buffer, primary.from);
        }
        self.transactions.push(transaction);
    }
}

/// Byte offset of a line/column position, clamped to the end of `text`
fn byte_offset(text: &str, position: CursorPosition) -> usize {
    let mut line = 0;
    let mut column = 0;
    for (offset, c) in text.char_indices() {
        if line == position.line && column == position.column {
            return offset;
        }
        if c == '\n' {
            if line == position.line {
                return offset;
            }
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    text.len()
}

/// Workspace with at most one open editor, reading documents from a vault
pub struct FakeWorkspace {
    vault_root: PathBuf,
    active: Option<FakeSurface>,
}

impl FakeWorkspace {
    pub fn new(vault_root: &Path) -> Self {
        Self {
            vault_root: vault_root.to_path_buf(),
            active: None,
        }
    }

    pub fn surface(&self) -> Option<&FakeSurface> {
        self.active.as_ref()
    }
}

#[async_trait]
impl Workspace for FakeWorkspace {
    type Surface = FakeSurface;

    fn active_surface(&mut self) -> Option<&mut FakeSurface> {
        self.active.as_mut()
    }

    async fn open(&mut self, document: &DocumentRef) -> Result<&mut FakeSurface, SurfaceError> {
        let content = read_file(document.relative_path(), &self.vault_root)
            .map_err(|_| SurfaceError::OpenFailed(document.clone()))?;
        let surface = FakeSurface::new(document.clone(), Some(self.vault_root.clone()), &content);
        Ok(self.active.insert(surface))
    }
}

pub struct FakePreview {
    text: String,
}

impl FakePreview {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl PreviewSurface for FakePreview {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

enum Script {
    Fail(String),
    Replace { from: String, to: String },
}

/// Renderer with canned behaviour that records the context modes it saw
pub struct ScriptedRenderer {
    script: Script,
    seen: Mutex<Vec<ContextMode>>,
}

impl ScriptedRenderer {
    pub fn failing(message: &str) -> Self {
        Self {
            script: Script::Fail(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replacing(from: &str, to: &str) -> Self {
        Self {
            script: Script::Replace {
                from: from.to_string(),
                to: to.to_string(),
            },
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_modes(&self) -> Vec<ContextMode> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn render(
        &self,
        template: &str,
        _config: &RunningConfig,
        mode: ContextMode,
    ) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(mode);
        match &self.script {
            Script::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Script::Replace { from, to } => Ok(template.replace(from.as_str(), to)),
        }
    }
}
