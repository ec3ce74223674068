//! Registry of live app instances, at most one per app id.

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use desktop_app_contract::{AppHandle, AppId, AppModule, WindowId, WindowManager};

use crate::error::RegistryError;

#[derive(Clone)]
/// A live, initialized app and the window it is known to own.
pub struct AppInstance {
    /// App the instance belongs to.
    pub app_id: AppId,
    /// Window recorded for the instance. May dangle; callers re-check with the window manager.
    pub window_id: Option<WindowId>,
    /// Module the instance was created from.
    pub module: AppModule,
    /// The running app.
    pub handle: Rc<dyn AppHandle>,
}

impl AppInstance {
    /// Creates an instance with no recorded window.
    pub fn new(app_id: AppId, module: AppModule, handle: Rc<dyn AppHandle>) -> Self {
        Self {
            app_id,
            window_id: None,
            module,
            handle,
        }
    }

    /// Recorded window id, falling back to the window the app tracks itself.
    pub fn known_window_id(&self) -> Option<WindowId> {
        self.window_id.or_else(|| self.handle.window_id())
    }

    fn owns_window(&self, window_id: WindowId) -> bool {
        self.window_id == Some(window_id) || self.handle.window_id() == Some(window_id)
    }
}

impl fmt::Debug for AppInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppInstance")
            .field("app_id", &self.app_id)
            .field("window_id", &self.window_id)
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
/// Uniqueness-enforcing map from app id to live instance.
///
/// Borrows are never held while calling into an app handle or the window manager, so close
/// listeners may re-enter the registry from inside those calls.
pub struct AppInstanceRegistry {
    instances: RefCell<BTreeMap<AppId, AppInstance>>,
}

impl AppInstanceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an instance is registered for `app_id`.
    pub fn has(&self, app_id: &AppId) -> bool {
        self.instances.borrow().contains_key(app_id)
    }

    /// Returns the registered instance for `app_id`.
    pub fn get(&self, app_id: &AppId) -> Option<AppInstance> {
        self.instances.borrow().get(app_id).cloned()
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Returns whether no instance is registered.
    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }

    /// Registers `instance`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] and leaves the existing entry untouched when
    /// the app already has an instance.
    pub fn register(&self, instance: AppInstance) -> Result<(), RegistryError> {
        let mut instances = self.instances.borrow_mut();
        if instances.contains_key(&instance.app_id) {
            return Err(RegistryError::AlreadyRegistered(instance.app_id));
        }
        instances.insert(instance.app_id.clone(), instance);
        Ok(())
    }

    /// Removes the instance for `app_id`, releasing its module singleton. Idempotent.
    pub fn evict(&self, app_id: &AppId) -> Option<AppInstance> {
        let removed = self.instances.borrow_mut().remove(app_id);
        if let Some(instance) = &removed {
            instance.module.release_singleton();
            log::debug!("evicted instance of {app_id}");
        }
        removed
    }

    /// Evicts the instance owning `window_id`. Unknown windows are ignored.
    pub fn evict_by_window_id(&self, window_id: WindowId) -> Option<AppId> {
        let candidates: Vec<AppInstance> = self.instances.borrow().values().cloned().collect();
        let owner = candidates
            .into_iter()
            .find(|instance| instance.owns_window(window_id))?;
        self.evict(&owner.app_id).map(|instance| instance.app_id)
    }

    /// Records the window id for a registered instance.
    pub fn set_window_id(&self, app_id: &AppId, window_id: WindowId) {
        if let Some(instance) = self.instances.borrow_mut().get_mut(app_id) {
            instance.window_id = Some(window_id);
        }
    }

    /// Resolves the window of `app_id`'s instance, adopting one when none is recorded.
    ///
    /// Resolution order is the recorded id, then the id the app tracks itself, then the
    /// topmost live window tagged with the app id. Any adopted id is recorded. The returned
    /// id is not checked for liveness.
    pub fn resolve_window_id(
        &self,
        app_id: &AppId,
        window_manager: &dyn WindowManager,
    ) -> Option<WindowId> {
        let instance = self.get(app_id)?;
        if let Some(window_id) = instance.window_id {
            return Some(window_id);
        }

        let adopted = instance.handle.window_id().or_else(|| {
            window_manager
                .windows_for_app(app_id)
                .into_iter()
                .max_by_key(|window| window.z_index)
                .map(|window| window.id)
        })?;
        log::debug!("adopted {adopted} for {app_id}");
        self.set_window_id(app_id, adopted);
        Some(adopted)
    }
}
