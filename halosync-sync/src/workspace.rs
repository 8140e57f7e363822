//! Editing environment seam and its file-backed implementation.
//!
//! ## `atomic_write` protocol
//!
//! 1. Ensure the parent directory exists.
//! 2. Write to `<path>.halosync.tmp`.
//! 3. Rename to the final path (atomic on POSIX).
//! 4. On rename failure, remove the `.tmp` and leave the original intact.

use std::path::{Path, PathBuf};

use halosync_core::{DocumentHandle, LocalDocument, Metadata};

use crate::document::{self, Document};
use crate::error::{io_err, WorkspaceError};

/// What the orchestrator needs from the place documents are edited.
///
/// The orchestrator receives one of these per call; it never reaches for an
/// ambient editor state.
pub trait EditingEnvironment {
    /// The active document, or `None` when there is nothing to act on.
    fn read_active_document(&self) -> Result<Option<LocalDocument>, WorkspaceError>;

    /// Replace the active document's metadata with `mutator(current)`.
    fn write_metadata_block(
        &mut self,
        mutator: &dyn Fn(&Metadata) -> Metadata,
    ) -> Result<(), WorkspaceError>;

    /// Replace the active document's body, keeping its metadata block.
    fn replace_document(&mut self, raw_body: &str) -> Result<(), WorkspaceError>;

    fn create_document(&mut self, name: &str, raw_body: &str)
        -> Result<DocumentHandle, WorkspaceError>;

    /// Make `handle` the active document.
    fn open_document(&mut self, handle: &DocumentHandle) -> Result<(), WorkspaceError>;
}

// ---------------------------------------------------------------------------
// FileWorkspace
// ---------------------------------------------------------------------------

/// Documents are Markdown files; new ones are created under `root`.
#[derive(Debug, Clone)]
pub struct FileWorkspace {
    root: PathBuf,
    active: Option<PathBuf>,
}

impl FileWorkspace {
    /// Workspace rooted at `root` with no active document.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: None,
        }
    }

    /// Workspace whose active document is `path`, rooted at its directory.
    pub fn for_document(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            root,
            active: Some(path),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn active(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    fn active_path(&self) -> Result<&Path, WorkspaceError> {
        self.active.as_deref().ok_or(WorkspaceError::NoActiveDocument)
    }

    fn load(path: &Path) -> Result<Document, WorkspaceError> {
        let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        document::parse(&text).map_err(|source| WorkspaceError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })
    }

    fn store(path: &Path, doc: &Document) -> Result<(), WorkspaceError> {
        let text = document::render(doc).map_err(|source| WorkspaceError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;
        atomic_write(path, &text)
    }
}

impl EditingEnvironment for FileWorkspace {
    fn read_active_document(&self) -> Result<Option<LocalDocument>, WorkspaceError> {
        let Some(path) = self.active.as_deref() else {
            return Ok(None);
        };
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "active document does not exist");
            return Ok(None);
        }
        let doc = Self::load(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Some(LocalDocument {
            handle: DocumentHandle(path.to_path_buf()),
            name,
            raw_body: doc.body,
            metadata: doc.metadata,
        }))
    }

    fn write_metadata_block(
        &mut self,
        mutator: &dyn Fn(&Metadata) -> Metadata,
    ) -> Result<(), WorkspaceError> {
        let path = self.active_path()?;
        let mut doc = Self::load(path)?;
        doc.metadata = mutator(&doc.metadata);
        Self::store(path, &doc)
    }

    fn replace_document(&mut self, raw_body: &str) -> Result<(), WorkspaceError> {
        let path = self.active_path()?;
        let mut doc = Self::load(path)?;
        doc.body = raw_body.to_string();
        Self::store(path, &doc)
    }

    fn create_document(
        &mut self,
        name: &str,
        raw_body: &str,
    ) -> Result<DocumentHandle, WorkspaceError> {
        let path = self.root.join(format!("{}.md", file_name_for(name)));
        if path.exists() {
            return Err(WorkspaceError::AlreadyExists { path });
        }
        atomic_write(&path, raw_body)?;
        tracing::info!(path = %path.display(), "document created");
        Ok(DocumentHandle(path))
    }

    fn open_document(&mut self, handle: &DocumentHandle) -> Result<(), WorkspaceError> {
        self.active = Some(handle.0.clone());
        Ok(())
    }
}

/// `name` with path separators and control characters replaced.
fn file_name_for(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.');
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<(), WorkspaceError> {
    let tmp = PathBuf::from(format!("{}.halosync.tmp", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), WorkspaceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!(path = %path.display(), "wrote");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use halosync_core::{merge, MetadataPatch};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_active_document_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let ws = FileWorkspace::for_document(tmp.path().join("absent.md"));
        assert!(ws.read_active_document().unwrap().is_none());
        assert!(FileWorkspace::new(tmp.path()).read_active_document().unwrap().is_none());
    }

    #[test]
    fn read_splits_metadata_and_uses_file_stem_as_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("My Post.md");
        fs::write(&path, "---\ntitle: T\n---\nbody\n").unwrap();

        let doc = FileWorkspace::for_document(&path)
            .read_active_document()
            .unwrap()
            .expect("document");
        assert_eq!(doc.name, "My Post");
        assert_eq!(doc.raw_body, "body\n");
        assert_eq!(doc.metadata.title.as_deref(), Some("T"));
    }

    #[test]
    fn metadata_write_keeps_body_and_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("p.md");
        fs::write(&path, "---\nauthor: me\n---\nbody\n").unwrap();
        let mut ws = FileWorkspace::for_document(&path);

        ws.write_metadata_block(&|old| {
            merge(
                old,
                MetadataPatch {
                    title: Some("New".into()),
                    ..MetadataPatch::default()
                },
            )
        })
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let doc = document::parse(&text).unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("New"));
        assert!(doc.metadata.extra.contains_key("author"));
        assert_eq!(doc.body, "body\n");
    }

    #[test]
    fn replace_document_keeps_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("p.md");
        fs::write(&path, "---\ntitle: T\n---\nold body\n").unwrap();
        let mut ws = FileWorkspace::for_document(&path);

        ws.replace_document("new body").unwrap();

        let doc = document::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("T"));
        assert_eq!(doc.body, "new body");
    }

    #[test]
    fn create_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let mut ws = FileWorkspace::new(tmp.path());
        let handle = ws.create_document("Hello", "body").unwrap();
        assert_eq!(handle.0, tmp.path().join("Hello.md"));

        let err = ws.create_document("Hello", "other").unwrap_err();
        assert!(matches!(err, WorkspaceError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&handle.0).unwrap(), "body");
    }

    #[test]
    fn open_makes_document_active() {
        let tmp = TempDir::new().unwrap();
        let mut ws = FileWorkspace::new(tmp.path());
        let handle = ws.create_document("a/b: c", "x").unwrap();
        assert_eq!(handle.0, tmp.path().join("a-b- c.md"));
        ws.open_document(&handle).unwrap();
        assert_eq!(ws.active(), Some(handle.0.as_path()));
    }

    #[test]
    fn writes_without_active_document_fail() {
        let tmp = TempDir::new().unwrap();
        let mut ws = FileWorkspace::new(tmp.path());
        let err = ws.replace_document("x").unwrap_err();
        assert!(matches!(err, WorkspaceError::NoActiveDocument));
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("clean.md");
        atomic_write(&path, "data").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "data");
        let tmp_path = PathBuf::from(format!("{}.halosync.tmp", path.display()));
        assert!(!tmp_path.exists(), ".halosync.tmp must be cleaned up");
    }

    #[test]
    fn rename_failure_cleans_tmp() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("occupied");
        fs::create_dir_all(target.join("child")).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("occupied.halosync.tmp");
        let result = atomic_write_with_tmp(&target, "new content", &tmp_path);

        assert!(result.is_err(), "a file cannot replace a non-empty directory");
        assert!(target.join("child").is_dir());
        assert!(!tmp_path.exists(), ".halosync.tmp should be cleaned up");
    }
}
