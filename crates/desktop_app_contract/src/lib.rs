//! Shared contract types between the desktop shell launcher and managed apps.
//!
//! Apps are addressed by a stable [`AppId`], described by a manifest-backed [`AppDescriptor`],
//! and driven through the [`AppHandle`] lifecycle (`init`, then `open`). Optional behaviour is
//! declared up front through [`AppCapability`] instead of being probed at call time.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod module;
mod options;
mod window;

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

pub use module::{AppFactory, AppModule, InstanceMode};
pub use options::{
    LaunchOptions, OpenRequest, OPTION_CONTENT, OPTION_FILE_NAME, OPTION_FILE_PATH, OPTION_PATH,
};
pub use window::{WindowClosedListener, WindowConfig, WindowId, WindowManager, WindowSnapshot};

/// Boxed non-`Send` future returned by [`AppHandle`] async methods.
pub type AppFuture<'a, T> = LocalBoxFuture<'a, T>;

/// Stable identifier for a logical application (for example `app3`).
///
/// Ids are lowercase `[a-z][a-z0-9_-]*` tokens of at most 64 bytes that do not end in `-` or
/// `_`. Manifest ids are validated while deserializing, so a manifest containing any other id
/// fails to load as a whole.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    /// Returns an app identifier when `raw` is a lowercase `[a-z][a-z0-9_-]*` token.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_app_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid app id `{raw}`; expected a lowercase token such as `app3`"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AppId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(value: AppId) -> Self {
        value.0
    }
}

impl std::str::FromStr for AppId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn is_valid_app_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 64 {
        return false;
    }
    let bytes = raw.as_bytes();
    if !bytes[0].is_ascii_lowercase() {
        return false;
    }
    if raw.ends_with(['-', '_']) {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'_'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Optional behaviours an app declares so the shell can route continuation requests to it.
pub enum AppCapability {
    /// Accepts [`AppHandle::navigate`] with a path while running.
    Navigable,
    /// Accepts [`OpenRequest::File`] (file name plus text content).
    FileOpenable,
    /// Accepts [`OpenRequest::Media`] (file name plus media path).
    MediaOpenable,
}

impl AppCapability {
    /// Returns a stable string token for logs and diagnostics.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Navigable => "navigable",
            Self::FileOpenable => "file-openable",
            Self::MediaOpenable => "media-openable",
        }
    }
}

const fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Manifest-backed static metadata for one installable app.
pub struct AppDescriptor {
    /// Canonical app id.
    pub id: AppId,
    /// Human-readable display name.
    pub name: String,
    /// Icon path relative to the shell's asset root.
    pub icon: String,
    /// Whether the app can be launched; `false` shows the "coming soon" notice instead.
    #[serde(default = "default_available")]
    pub available: bool,
}

impl AppDescriptor {
    /// Creates an available descriptor.
    pub fn new(id: AppId, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            available: true,
        }
    }

    /// Marks the descriptor as unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Manifest document enumerating every app the shell knows about.
pub struct AppManifest {
    /// Declared apps in manifest order.
    pub apps: Vec<AppDescriptor>,
}

#[derive(Clone)]
/// Context bundle handed to [`AppHandle::init`].
pub struct AppContext {
    /// Window manager the app creates and updates its window through.
    pub window_manager: Rc<dyn WindowManager>,
    /// Descriptor of the app being initialized.
    pub descriptor: AppDescriptor,
    /// Caller-supplied launch options, unmodified.
    pub options: LaunchOptions,
    /// Full app catalog, for apps that list or launch other apps.
    pub catalog: Rc<[AppDescriptor]>,
}

/// Lifecycle surface every launchable app implements.
///
/// Handles are shared (`Rc<dyn AppHandle>`), so implementations keep their mutable state behind
/// interior mutability.
pub trait AppHandle {
    /// Capabilities this app supports beyond `init`/`open`.
    fn capabilities(&self) -> &[AppCapability] {
        &[]
    }

    /// Returns whether `capability` is declared by [`AppHandle::capabilities`].
    fn supports(&self, capability: AppCapability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Prepares the app. An `Err` means the app refused to start and must not be registered.
    fn init(&self, context: AppContext) -> AppFuture<'_, Result<(), String>>;

    /// Opens (or re-opens) the app with an app-specific request.
    fn open(&self, request: OpenRequest) -> AppFuture<'_, Result<(), String>>;

    /// Navigates a running app to `path`. Only called on [`AppCapability::Navigable`] apps.
    fn navigate(&self, path: &str) -> Result<(), String> {
        Err(format!("navigation to `{path}` is not supported"))
    }

    /// Window the app created for itself, when it tracks one.
    fn window_id(&self) -> Option<WindowId> {
        None
    }
}
