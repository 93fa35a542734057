use async_trait::async_trait;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::DocumentRef;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid vault directory: {0}")]
    InvalidVaultDir(String),
}

/// Where documents are read from and persisted to
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self, document: &DocumentRef) -> Result<String, StorageError>;

    /// Replace the whole content of `document`.
    async fn write(&self, document: &DocumentRef, content: &str) -> Result<(), StorageError>;

    /// Create an empty markdown document in `parent` named after
    /// `default_name`, numbering it if the name is taken.
    async fn create(
        &self,
        parent: &RelativePath,
        default_name: &str,
    ) -> Result<DocumentRef, StorageError>;

    async fn delete(&self, document: &DocumentRef) -> Result<(), StorageError>;

    async fn exists(&self, document: &DocumentRef) -> bool;
}

/// Documents stored as files under a vault root directory
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    vault_root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(vault_root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let vault_root = vault_root.into();
        validate_vault_dir(&vault_root)?;
        Ok(Self { vault_root })
    }

    fn first_free_name(&self, parent: &RelativePath, default_name: &str) -> RelativePathBuf {
        let mut candidate = parent.join(format!("{default_name}.md"));
        let mut n = 1;
        while candidate.to_path(&self.vault_root).exists() {
            candidate = parent.join(format!("{default_name} {n}.md"));
            n += 1;
        }
        candidate
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read(&self, document: &DocumentRef) -> Result<String, StorageError> {
        read_file(document.relative_path(), &self.vault_root)
    }

    async fn write(&self, document: &DocumentRef, content: &str) -> Result<(), StorageError> {
        write_file(document.relative_path(), &self.vault_root, content)
    }

    async fn create(
        &self,
        parent: &RelativePath,
        default_name: &str,
    ) -> Result<DocumentRef, StorageError> {
        let relative_path = self.first_free_name(parent, default_name);
        write_file(&relative_path, &self.vault_root, "")?;
        log::debug!("created {relative_path}");
        Ok(DocumentRef::new(relative_path))
    }

    async fn delete(&self, document: &DocumentRef) -> Result<(), StorageError> {
        let absolute_path = document.relative_path().to_path(&self.vault_root);
        if !absolute_path.exists() {
            return Err(StorageError::NotFound(absolute_path));
        }
        fs::remove_file(&absolute_path).map_err(StorageError::Io)
    }

    async fn exists(&self, document: &DocumentRef) -> bool {
        document.relative_path().to_path(&self.vault_root).is_file()
    }
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, vault_root: &Path) -> Result<String, StorageError> {
    let absolute_path = relative_path.to_path(vault_root);
    if !absolute_path.exists() {
        return Err(StorageError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(StorageError::Io)
}

/// Write content to a markdown file
pub fn write_file(
    relative_path: &RelativePath,
    vault_root: &Path,
    content: &str,
) -> Result<(), StorageError> {
    let absolute_path = relative_path.to_path(vault_root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(StorageError::Io)
}

pub fn validate_vault_dir(path: &Path) -> Result<(), StorageError> {
    if !path.exists() || !path.is_dir() {
        return Err(StorageError::InvalidVaultDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
