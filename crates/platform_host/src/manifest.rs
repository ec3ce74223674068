//! App manifest source contracts and adapters.

use std::{
    cell::{Cell, RefCell},
    future::Future,
    path::PathBuf,
    pin::Pin,
    rc::Rc,
};

/// Object-safe boxed future used by [`ManifestSource`] async methods.
pub type ManifestFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that retrieves the raw app manifest document.
pub trait ManifestSource {
    /// Fetches the manifest text. Parsing is the caller's concern.
    fn fetch_manifest(&self) -> ManifestFuture<'_, Result<String, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Manifest source for hosts without a manifest; every fetch fails.
pub struct NoopManifestSource;

impl ManifestSource for NoopManifestSource {
    fn fetch_manifest(&self) -> ManifestFuture<'_, Result<String, String>> {
        Box::pin(async { Err("no manifest source configured".to_string()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory manifest source that counts fetches.
pub struct MemoryManifestSource {
    raw: Rc<RefCell<Option<String>>>,
    fetches: Rc<Cell<usize>>,
}

impl MemoryManifestSource {
    /// Creates a source serving `raw`.
    pub fn new(raw: impl Into<String>) -> Self {
        let source = Self::default();
        source.set(raw);
        source
    }

    /// Replaces the served document.
    pub fn set(&self, raw: impl Into<String>) {
        *self.raw.borrow_mut() = Some(raw.into());
    }

    /// Makes subsequent fetches fail.
    pub fn clear(&self) {
        self.raw.borrow_mut().take();
    }

    /// Number of fetches served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl ManifestSource for MemoryManifestSource {
    fn fetch_manifest(&self) -> ManifestFuture<'_, Result<String, String>> {
        Box::pin(async move {
            self.fetches.set(self.fetches.get() + 1);
            self.raw
                .borrow()
                .clone()
                .ok_or_else(|| "manifest not available".to_string())
        })
    }
}

#[derive(Debug, Clone)]
/// Manifest source reading a file from disk.
pub struct FsManifestSource {
    path: PathBuf,
}

impl FsManifestSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestSource for FsManifestSource {
    fn fetch_manifest(&self) -> ManifestFuture<'_, Result<String, String>> {
        Box::pin(async move {
            std::fs::read_to_string(&self.path)
                .map_err(|err| format!("failed to read {}: {err}", self.path.display()))
        })
    }
}
