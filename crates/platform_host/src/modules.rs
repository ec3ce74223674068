//! Executable app-unit sources and the symbol table they register entry points into.
//!
//! Executing a unit is modelled the way a script host does it: the unit runs once and, as a side
//! effect, defines one or more named entry points in a process-wide [`SymbolTable`]. The loader
//! then looks up the entry point it expects. A unit that runs without defining that symbol is a
//! packaging error, not a transport error.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    future::Future,
    pin::Pin,
    rc::Rc,
};

use desktop_app_contract::{AppId, AppModule};

/// Object-safe boxed future used by [`ModuleSource`] async methods.
pub type ModuleSourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Default)]
/// Shared table of entry-point symbols defined by executed app units.
pub struct SymbolTable {
    inner: Rc<RefCell<BTreeMap<String, AppModule>>>,
}

impl SymbolTable {
    /// Defines `name` unless it already exists. Returns whether the definition was added.
    ///
    /// First definition wins, so re-executing a unit cannot replace a module the shell has
    /// already handed out.
    pub fn define(&self, name: impl Into<String>, module: AppModule) -> bool {
        let name = name.into();
        let mut inner = self.inner.borrow_mut();
        if inner.contains_key(&name) {
            return false;
        }
        inner.insert(name, module);
        true
    }

    /// Looks up a defined entry point.
    pub fn lookup(&self, name: &str) -> Option<AppModule> {
        self.inner.borrow().get(name).cloned()
    }

    /// Returns whether `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().contains_key(name)
    }

    /// Defined symbol names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }
}

/// Host service that fetches and executes the unit backing an app id.
pub trait ModuleSource {
    /// Runs the unit for `app_id`, letting it define its entry points in `symbols`.
    fn execute<'a>(
        &'a self,
        app_id: &'a AppId,
        symbols: &'a SymbolTable,
    ) -> ModuleSourceFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Module source for hosts that cannot load app code.
pub struct NoopModuleSource;

impl ModuleSource for NoopModuleSource {
    fn execute<'a>(
        &'a self,
        app_id: &'a AppId,
        _symbols: &'a SymbolTable,
    ) -> ModuleSourceFuture<'a, Result<(), String>> {
        Box::pin(async move { Err(format!("no module source for `{app_id}`")) })
    }
}

/// Registration routine standing in for an app unit's top-level code.
pub type ModuleInstaller = Rc<dyn Fn(&SymbolTable)>;

#[derive(Clone, Default)]
/// Static registry-by-id module source for apps compiled into the host.
///
/// Each app id maps to an installer that defines the app's entry points when executed. The
/// source counts executions per id so callers can verify units run at most once.
pub struct StaticModuleSource {
    installers: Rc<RefCell<HashMap<AppId, ModuleInstaller>>>,
    executions: Rc<RefCell<HashMap<AppId, usize>>>,
}

impl StaticModuleSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the installer for `app_id`, replacing any previous one.
    pub fn register<F>(&self, app_id: AppId, installer: F)
    where
        F: Fn(&SymbolTable) + 'static,
    {
        self.installers
            .borrow_mut()
            .insert(app_id, Rc::new(installer));
    }

    /// Registers a unit that defines a single module under its own entry point.
    pub fn register_module(&self, app_id: AppId, module: AppModule) {
        self.register(app_id, move |symbols| {
            symbols.define(module.entry_point().to_string(), module.clone());
        });
    }

    /// Number of times the unit for `app_id` was executed.
    pub fn executions(&self, app_id: &AppId) -> usize {
        self.executions.borrow().get(app_id).copied().unwrap_or(0)
    }
}

impl ModuleSource for StaticModuleSource {
    fn execute<'a>(
        &'a self,
        app_id: &'a AppId,
        symbols: &'a SymbolTable,
    ) -> ModuleSourceFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let installer = self
                .installers
                .borrow()
                .get(app_id)
                .cloned()
                .ok_or_else(|| format!("failed to load app unit `apps/{app_id}`"))?;
            *self
                .executions
                .borrow_mut()
                .entry(app_id.clone())
                .or_default() += 1;
            installer(symbols);
            Ok(())
        })
    }
}
