//! Error taxonomy for catalog loading, module loading, registry mutation, and launches.

use desktop_app_contract::AppId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures while loading the manifest or an app's executable unit.
pub enum LoadError {
    /// The manifest could not be fetched or parsed.
    #[error("app manifest unavailable: {reason}")]
    ManifestUnavailable {
        /// Transport or parse error text.
        reason: String,
    },
    /// The app unit could not be fetched or executed.
    #[error("failed to load module for `{app_id}`: {reason}")]
    ModuleLoad {
        /// App whose unit failed.
        app_id: AppId,
        /// Source error text.
        reason: String,
    },
    /// The unit ran but did not define the expected entry point.
    #[error("module for `{app_id}` did not define entry point `{entry_point}`")]
    EntryPointMissing {
        /// App whose unit was executed.
        app_id: AppId,
        /// Entry-point name the loader expected.
        entry_point: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Instance registry mutation errors.
pub enum RegistryError {
    /// An instance is already registered for the app.
    #[error("an instance of `{0}` is already registered")]
    AlreadyRegistered(AppId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by a launch request.
pub enum LaunchError {
    /// Manifest or module loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The app id is not in the catalog.
    #[error("app `{0}` not found in the catalog")]
    AppNotFound(AppId),
    /// The catalog marks the app unavailable.
    #[error("app `{0}` is not available yet")]
    AppUnavailable(AppId),
    /// The app's `init` refused to start.
    #[error("failed to initialize `{app_id}`: {reason}")]
    InitializationFailure {
        /// App that failed to initialize.
        app_id: AppId,
        /// App-supplied reason.
        reason: String,
    },
    /// The app was registered but its `open` reported an error.
    #[error("failed to open `{app_id}`: {reason}")]
    OpenFailure {
        /// App that failed to open.
        app_id: AppId,
        /// App-supplied reason.
        reason: String,
    },
    /// The registry rejected the new instance.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
