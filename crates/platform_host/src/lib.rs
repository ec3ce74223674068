//! Typed host-domain contracts used by the desktop shell runtime.
//!
//! This crate is the boundary between the launcher and whatever supplies its inputs: the app
//! manifest, executable app units, file contents, and TOML configuration. Each service is an
//! object-safe trait returning boxed futures, with no-op and in-memory adapters for
//! unsupported targets and tests plus filesystem-backed adapters for native hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod content;
pub mod manifest;
pub mod modules;

pub use config::{ConfigError, ConfigLoader};
pub use content::{
    normalize_virtual_path, FileContentFuture, FileContentSource, FsFileContentSource,
    MemoryFileContentSource, NoopFileContentSource,
};
pub use manifest::{
    FsManifestSource, ManifestFuture, ManifestSource, MemoryManifestSource, NoopManifestSource,
};
pub use modules::{
    ModuleInstaller, ModuleSource, ModuleSourceFuture, NoopModuleSource, StaticModuleSource,
    SymbolTable,
};
