use relative_path::{RelativePath, RelativePathBuf};

/// A markdown document inside the vault, addressed by its vault-relative path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    relative_path: RelativePathBuf,
}

impl DocumentRef {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        Self { relative_path }
    }

    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.relative_path.as_str())
    }
}

impl From<RelativePathBuf> for DocumentRef {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for DocumentRef {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}
