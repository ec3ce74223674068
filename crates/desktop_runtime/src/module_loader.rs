//! On-demand app module loading with a process-lifetime cache.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use desktop_app_contract::{AppId, AppModule};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use platform_host::{ModuleSource, SymbolTable};

use crate::{config::EntryPointNames, error::LoadError};

type PendingLoad = Shared<LocalBoxFuture<'static, Result<AppModule, LoadError>>>;

struct LoaderInner {
    source: Rc<dyn ModuleSource>,
    symbols: SymbolTable,
    entry_points: EntryPointNames,
    cache: RefCell<HashMap<AppId, AppModule>>,
    in_flight: RefCell<HashMap<AppId, PendingLoad>>,
}

#[derive(Clone)]
/// Resolves app ids to loaded [`AppModule`]s.
///
/// A module is loaded at most once per app id: cache hits return immediately and concurrent
/// loads of the same id await one shared execution. The cache is never invalidated.
pub struct ModuleLoader {
    inner: Rc<LoaderInner>,
}

impl ModuleLoader {
    /// Creates a loader executing units from `source` into a fresh symbol table.
    pub fn new(source: Rc<dyn ModuleSource>, entry_points: EntryPointNames) -> Self {
        Self::with_symbols(source, entry_points, SymbolTable::default())
    }

    /// Creates a loader sharing an existing symbol table.
    pub fn with_symbols(
        source: Rc<dyn ModuleSource>,
        entry_points: EntryPointNames,
        symbols: SymbolTable,
    ) -> Self {
        Self {
            inner: Rc::new(LoaderInner {
                source,
                symbols,
                entry_points,
                cache: RefCell::new(HashMap::new()),
                in_flight: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Loads the module for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::ModuleLoad`] when the unit cannot be executed and
    /// [`LoadError::EntryPointMissing`] when it runs without defining its entry point.
    pub async fn load(&self, app_id: &AppId) -> Result<AppModule, LoadError> {
        if let Some(module) = self.cached(app_id) {
            return Ok(module);
        }

        let pending = self.inner.in_flight.borrow().get(app_id).cloned();
        if let Some(pending) = pending {
            return pending.await;
        }

        let loader = self.clone();
        let owned_id = app_id.clone();
        let pending = async move {
            let result = loader.load_uncached(&owned_id).await;
            loader.inner.in_flight.borrow_mut().remove(&owned_id);
            result
        }
        .boxed_local()
        .shared();
        self.inner
            .in_flight
            .borrow_mut()
            .insert(app_id.clone(), pending.clone());
        pending.await
    }

    /// Returns the cached module for `app_id` without loading.
    pub fn cached(&self, app_id: &AppId) -> Option<AppModule> {
        self.inner.cache.borrow().get(app_id).cloned()
    }

    /// Symbol table units define their entry points in.
    pub fn symbols(&self) -> &SymbolTable {
        &self.inner.symbols
    }

    /// Entry-point name expected for `app_id`.
    pub fn entry_point_for(&self, app_id: &AppId) -> String {
        self.inner.entry_points.resolve(app_id)
    }

    async fn load_uncached(&self, app_id: &AppId) -> Result<AppModule, LoadError> {
        let entry_point = self.entry_point_for(app_id);

        let module = match self.inner.symbols.lookup(&entry_point) {
            Some(module) => {
                log::debug!("adopting already defined entry point `{entry_point}` for {app_id}");
                module
            }
            None => {
                self.inner
                    .source
                    .execute(app_id, &self.inner.symbols)
                    .await
                    .map_err(|reason| LoadError::ModuleLoad {
                        app_id: app_id.clone(),
                        reason,
                    })?;
                self.inner.symbols.lookup(&entry_point).ok_or_else(|| {
                    LoadError::EntryPointMissing {
                        app_id: app_id.clone(),
                        entry_point: entry_point.clone(),
                    }
                })?
            }
        };

        log::info!("loaded module `{entry_point}` for {app_id}");
        self.inner
            .cache
            .borrow_mut()
            .insert(app_id.clone(), module.clone());
        Ok(module)
    }
}
