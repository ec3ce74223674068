//! File content sources used when files are opened from the desktop.

use std::{
    cell::RefCell,
    collections::HashMap,
    future::Future,
    io::ErrorKind,
    path::PathBuf,
    pin::Pin,
    rc::Rc,
};

/// Object-safe boxed future used by [`FileContentSource`] async methods.
pub type FileContentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service reading text files addressed by virtual path.
pub trait FileContentSource {
    /// Reads the file at `path`.
    ///
    /// `Ok(None)` means the file does not exist; `Err` means it exists but could not be read.
    fn read_text<'a>(&'a self, path: &'a str)
        -> FileContentFuture<'a, Result<Option<String>, String>>;
}

/// Normalizes a virtual path: trims whitespace, converts backslashes to `/`, resolves `.`/`..`
/// without escaping the root, ensures a leading slash, and returns `/` for empty paths.
pub fn normalize_virtual_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let mut out = String::new();
    for segment in trimmed.replace('\\', "/").split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            if let Some(idx) = out.rfind('/') {
                out.truncate(idx);
            }
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Content source for hosts without file access; every file is missing.
pub struct NoopFileContentSource;

impl FileContentSource for NoopFileContentSource {
    fn read_text<'a>(
        &'a self,
        _path: &'a str,
    ) -> FileContentFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory content source keyed by normalized virtual path.
pub struct MemoryFileContentSource {
    files: Rc<RefCell<HashMap<String, Result<String, String>>>>,
}

impl MemoryFileContentSource {
    /// Stores readable text at `path`.
    pub fn insert(&self, path: &str, text: impl Into<String>) {
        self.files
            .borrow_mut()
            .insert(normalize_virtual_path(path), Ok(text.into()));
    }

    /// Marks `path` as present but unreadable.
    pub fn insert_unreadable(&self, path: &str, reason: impl Into<String>) {
        self.files
            .borrow_mut()
            .insert(normalize_virtual_path(path), Err(reason.into()));
    }
}

impl FileContentSource for MemoryFileContentSource {
    fn read_text<'a>(
        &'a self,
        path: &'a str,
    ) -> FileContentFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move {
            match self.files.borrow().get(&normalize_virtual_path(path)) {
                None => Ok(None),
                Some(Ok(text)) => Ok(Some(text.clone())),
                Some(Err(reason)) => Err(reason.clone()),
            }
        })
    }
}

#[derive(Debug, Clone)]
/// Content source reading files beneath a root directory on disk.
pub struct FsFileContentSource {
    root: PathBuf,
}

impl FsFileContentSource {
    /// Creates a source rooted at `root`. Virtual paths cannot escape it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let normalized = normalize_virtual_path(path);
        self.root.join(normalized.trim_start_matches('/'))
    }
}

impl FileContentSource for FsFileContentSource {
    fn read_text<'a>(
        &'a self,
        path: &'a str,
    ) -> FileContentFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move {
            let resolved = self.resolve(path);
            match std::fs::read_to_string(&resolved) {
                Ok(text) => Ok(Some(text)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(format!("failed to read {}: {err}", resolved.display())),
            }
        })
    }
}
