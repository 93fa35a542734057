//! End-to-end template runs against an in-memory host.

use async_trait::async_trait;
use pollster::block_on;
use pretty_assertions::assert_eq;
use relative_path::{RelativePath, RelativePathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use templater_engine::{
    CaretTransaction, CursorJump, CursorPosition, DocumentRef, DocumentStore, EditableSurface,
    PassthroughRenderer, RunMode, RunOutcome, StorageError, SurfaceError, Templater,
    TemplaterError, Workspace,
};

type Documents = Arc<Mutex<BTreeMap<RelativePathBuf, String>>>;

#[derive(Clone, Default)]
struct MemoryStore {
    documents: Documents,
}

impl MemoryStore {
    fn with(documents: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut map = store.documents.lock().unwrap();
            for (path, content) in documents {
                map.insert(RelativePathBuf::from(*path), content.to_string());
            }
        }
        store
    }

    fn get(&self, path: &str) -> Option<String> {
        self.documents
            .lock()
            .unwrap()
            .get(RelativePath::new(path))
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, document: &DocumentRef) -> Result<String, StorageError> {
        self.documents
            .lock()
            .unwrap()
            .get(document.relative_path())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(document.relative_path().to_path("")))
    }

    async fn write(&self, document: &DocumentRef, content: &str) -> Result<(), StorageError> {
        self.documents
            .lock()
            .unwrap()
            .insert(document.relative_path().to_owned(), content.to_string());
        Ok(())
    }

    async fn create(
        &self,
        parent: &RelativePath,
        default_name: &str,
    ) -> Result<DocumentRef, StorageError> {
        let path = parent.join(format!("{default_name}.md"));
        self.documents
            .lock()
            .unwrap()
            .insert(path.clone(), String::new());
        Ok(DocumentRef::new(path))
    }

    async fn delete(&self, document: &DocumentRef) -> Result<(), StorageError> {
        self.documents
            .lock()
            .unwrap()
            .remove(document.relative_path());
        Ok(())
    }

    async fn exists(&self, document: &DocumentRef) -> bool {
        self.documents
            .lock()
            .unwrap()
            .contains_key(document.relative_path())
    }
}

/// Editor view that always shows the stored content
struct MemorySurface {
    document: DocumentRef,
    store: MemoryStore,
    transactions: Vec<CaretTransaction>,
}

#[async_trait]
impl EditableSurface for MemorySurface {
    fn document(&self) -> &DocumentRef {
        &self.document
    }

    async fn save(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn replace_selection(&mut self, text: &str) {
        let mut documents = self.store.documents.lock().unwrap();
        if let Some(content) = documents.get_mut(self.document.relative_path()) {
            content.push_str(text);
        }
    }

    // Edits go straight to the store, so there is no buffer to refresh
    fn set_content(&mut self, _content: &str) {}

    fn focus(&mut self) {}

    fn apply_transaction(&mut self, transaction: CaretTransaction) {
        self.transactions.push(transaction);
    }
}

struct MemoryWorkspace {
    store: MemoryStore,
    active: Option<MemorySurface>,
}

impl MemoryWorkspace {
    fn new(store: &MemoryStore) -> Self {
        Self {
            store: store.clone(),
            active: None,
        }
    }

    fn carets(&self) -> Vec<CursorPosition> {
        self.active
            .as_ref()
            .and_then(|s| s.transactions.last())
            .map(|t| t.selections.iter().map(|s| s.from).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Workspace for MemoryWorkspace {
    type Surface = MemorySurface;

    fn active_surface(&mut self) -> Option<&mut MemorySurface> {
        self.active.as_mut()
    }

    async fn open(&mut self, document: &DocumentRef) -> Result<&mut MemorySurface, SurfaceError> {
        Ok(self.active.insert(MemorySurface {
            document: document.clone(),
            store: self.store.clone(),
            transactions: Vec::new(),
        }))
    }
}

#[test]
fn create_from_template_strips_marker_and_places_caret() {
    let store = MemoryStore::with(&[("templates/greeting.md", "Hello <% tp.file.cursor() %>World")]);
    let templater = Templater::new(store.clone(), PassthroughRenderer);
    let mut workspace = MemoryWorkspace::new(&store);

    let outcome = block_on(templater.create_new_note_from_template(
        &mut workspace,
        &DocumentRef::from("templates/greeting.md"),
        None,
    ))
    .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Written {
            document: DocumentRef::from("Untitled.md"),
            cursor: CursorJump::Placed(1),
        }
    );
    assert_eq!(store.get("Untitled.md").as_deref(), Some("Hello World"));
    assert_eq!(workspace.carets(), vec![CursorPosition::new(0, 6)]);
}

#[test]
fn ordered_markers_are_visited_one_round_per_jump() {
    let store = MemoryStore::with(&[(
        "note.md",
        "name: <% tp.file.cursor(1) %>\ndate: <% tp.file.cursor(2) %>\ntags: <% tp.file.cursor(1) %>",
    )]);
    let templater = Templater::new(store.clone(), PassthroughRenderer);
    let mut workspace = MemoryWorkspace::new(&store);
    block_on(workspace.open(&DocumentRef::from("note.md"))).unwrap();

    let first = block_on(templater.overwrite_active_file_templates(&mut workspace)).unwrap();
    assert_eq!(
        first,
        RunOutcome::Written {
            document: DocumentRef::from("note.md"),
            cursor: CursorJump::Placed(2),
        }
    );
    assert_eq!(
        workspace.carets(),
        vec![CursorPosition::new(0, 6), CursorPosition::new(2, 6)]
    );

    let second = block_on(templater.overwrite_active_file_templates(&mut workspace)).unwrap();
    assert!(matches!(
        second,
        RunOutcome::Written {
            cursor: CursorJump::Placed(1),
            ..
        }
    ));
    assert_eq!(workspace.carets(), vec![CursorPosition::new(1, 6)]);
    assert_eq!(
        store.get("note.md").as_deref(),
        Some("name: \ndate: \ntags: ")
    );

    let third = block_on(templater.overwrite_active_file_templates(&mut workspace)).unwrap();
    assert!(matches!(
        third,
        RunOutcome::Written {
            cursor: CursorJump::NoMarkers,
            ..
        }
    ));
}

#[test]
fn append_without_active_editor_writes_nothing() {
    let store = MemoryStore::with(&[("t.md", "text")]);
    let templater = Templater::new(store.clone(), PassthroughRenderer);
    let mut workspace = MemoryWorkspace::new(&store);

    let err = block_on(templater.append_template(&mut workspace, &DocumentRef::from("t.md")))
        .unwrap_err();

    assert!(matches!(
        err,
        TemplaterError::NoActiveSurface {
            mode: RunMode::AppendToActiveDocument
        }
    ));
    assert_eq!(store.documents.lock().unwrap().len(), 1);
}
