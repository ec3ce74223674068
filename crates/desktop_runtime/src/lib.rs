//! Desktop shell runtime: app catalog, module loading, instance tracking, and launch orchestration.
//!
//! All state is single-threaded (`Rc`/`RefCell`) and every async operation returns a `!Send`
//! future meant to be driven by a local executor.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod builtin;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod instances;
pub mod launcher;
pub mod module_loader;
pub mod notice;
pub mod shell_state;
pub mod universal;
pub mod window_manager;

pub use builtin::builtin_module_source;
pub use catalog::AppCatalog;
pub use config::{EntryPointNames, OpenRoute, OpenRouteTable, ShellConfig};
pub use dispatch::OpenDispatch;
pub use error::{LaunchError, LoadError, RegistryError};
pub use instances::{AppInstance, AppInstanceRegistry};
pub use launcher::{AppLauncher, LaunchOutcome};
pub use module_loader::ModuleLoader;
pub use notice::{ModalNoticeBoard, NoticePresenter, UnavailableNotice};
pub use shell_state::ShellState;
pub use universal::{FileAction, FileHandler, LaunchItem, UniversalLauncher};
pub use window_manager::DesktopWindowManager;
