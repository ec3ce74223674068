//! App descriptor registry loaded once from the manifest source.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use desktop_app_contract::{AppDescriptor, AppId, AppManifest};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use platform_host::ManifestSource;

use crate::error::LoadError;

type PendingManifest = Shared<LocalBoxFuture<'static, Result<(), LoadError>>>;
type LoadedApps = Rc<RefCell<Option<Rc<[AppDescriptor]>>>>;

/// Read-only catalog of app descriptors.
///
/// The catalog starts empty. [`AppCatalog::load`] fetches the manifest once; after a success
/// further calls are no-ops, after a failure the catalog stays empty and may be loaded again.
/// Overlapping loads share a single fetch.
pub struct AppCatalog {
    source: Rc<dyn ManifestSource>,
    apps: LoadedApps,
    in_flight: Rc<RefCell<Option<PendingManifest>>>,
}

impl AppCatalog {
    /// Creates an unloaded catalog backed by `source`.
    pub fn new(source: Rc<dyn ManifestSource>) -> Self {
        Self {
            source,
            apps: Rc::new(RefCell::new(None)),
            in_flight: Rc::new(RefCell::new(None)),
        }
    }

    /// Fetches and parses the manifest unless it was already loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::ManifestUnavailable`] when the source fails, the JSON is malformed,
    /// or the manifest repeats an app id.
    pub async fn load(&self) -> Result<(), LoadError> {
        if self.is_loaded() {
            return Ok(());
        }

        let pending = self.in_flight.borrow().clone();
        if let Some(pending) = pending {
            return pending.await;
        }

        let source = Rc::clone(&self.source);
        let apps = Rc::clone(&self.apps);
        let in_flight = Rc::clone(&self.in_flight);
        let pending = async move {
            let result = fetch_into(source.as_ref(), &apps).await;
            in_flight.borrow_mut().take();
            result
        }
        .boxed_local()
        .shared();
        *self.in_flight.borrow_mut() = Some(pending.clone());
        pending.await
    }

    /// Returns whether a manifest has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.apps.borrow().is_some()
    }

    /// Looks up the descriptor for `app_id`.
    pub fn get(&self, app_id: &AppId) -> Option<AppDescriptor> {
        self.apps
            .borrow()
            .as_ref()?
            .iter()
            .find(|descriptor| &descriptor.id == app_id)
            .cloned()
    }

    /// Every descriptor in manifest order; empty before a successful load.
    pub fn all(&self) -> Rc<[AppDescriptor]> {
        self.apps
            .borrow()
            .as_ref()
            .map(Rc::clone)
            .unwrap_or_else(|| Rc::from(Vec::new()))
    }
}

async fn fetch_into(source: &dyn ManifestSource, apps: &LoadedApps) -> Result<(), LoadError> {
    let raw = source
        .fetch_manifest()
        .await
        .map_err(|reason| LoadError::ManifestUnavailable { reason })?;
    let manifest = parse_manifest(&raw)?;
    log::info!("app manifest loaded with {} apps", manifest.apps.len());

    let mut apps = apps.borrow_mut();
    if apps.is_none() {
        *apps = Some(manifest.apps.into());
    }
    Ok(())
}

fn parse_manifest(raw: &str) -> Result<AppManifest, LoadError> {
    let manifest: AppManifest =
        serde_json::from_str(raw).map_err(|err| LoadError::ManifestUnavailable {
            reason: format!("malformed app manifest: {err}"),
        })?;

    let mut seen = HashSet::new();
    for descriptor in &manifest.apps {
        if !seen.insert(&descriptor.id) {
            return Err(LoadError::ManifestUnavailable {
                reason: format!("duplicate app id `{}` in manifest", descriptor.id),
            });
        }
    }
    Ok(manifest)
}
