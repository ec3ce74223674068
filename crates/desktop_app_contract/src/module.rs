//! Loaded app modules: the instantiable unit the shell caches per app id.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::AppHandle;

/// Constructor producing a fresh app handle.
pub type AppFactory = Rc<dyn Fn() -> Rc<dyn AppHandle>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a module hands out instances.
pub enum InstanceMode {
    /// Every instantiation constructs a new handle; the shell registry enforces uniqueness.
    Transient,
    /// The module keeps one handle and returns it until released.
    Singleton,
}

type SingletonSlot = Rc<RefCell<Option<Rc<dyn AppHandle>>>>;

#[derive(Clone)]
/// Ready-to-instantiate representation of an app's code.
///
/// Clones share the same factory and singleton slot, so a cached module keeps its singleton
/// across launches until [`AppModule::release_singleton`] is called.
pub struct AppModule {
    entry_point: Rc<str>,
    factory: AppFactory,
    singleton: Option<SingletonSlot>,
}

impl AppModule {
    /// Creates a module whose every instantiation constructs a new handle.
    pub fn transient<F>(entry_point: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Rc<dyn AppHandle> + 'static,
    {
        Self {
            entry_point: Rc::from(entry_point.into()),
            factory: Rc::new(factory),
            singleton: None,
        }
    }

    /// Creates a module exposing a singleton accessor.
    pub fn singleton<F>(entry_point: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Rc<dyn AppHandle> + 'static,
    {
        Self {
            entry_point: Rc::from(entry_point.into()),
            factory: Rc::new(factory),
            singleton: Some(Rc::new(RefCell::new(None))),
        }
    }

    /// Entry-point symbol this module is registered under (for example `NotesApp`).
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Instance discipline of this module.
    pub fn instance_mode(&self) -> InstanceMode {
        if self.singleton.is_some() {
            InstanceMode::Singleton
        } else {
            InstanceMode::Transient
        }
    }

    /// Returns the singleton handle (creating it on first use) or a fresh transient handle.
    pub fn instantiate(&self) -> Rc<dyn AppHandle> {
        let Some(slot) = &self.singleton else {
            return (self.factory)();
        };
        if let Some(existing) = slot.borrow().as_ref() {
            return Rc::clone(existing);
        }
        let created = (self.factory)();
        *slot.borrow_mut() = Some(Rc::clone(&created));
        created
    }

    /// Drops the held singleton so the next instantiation constructs a new handle.
    pub fn release_singleton(&self) {
        if let Some(slot) = &self.singleton {
            slot.borrow_mut().take();
        }
    }

    /// Returns whether both values refer to the same loaded module.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.factory, &other.factory)
    }
}

impl fmt::Debug for AppModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppModule")
            .field("entry_point", &self.entry_point)
            .field("instance_mode", &self.instance_mode())
            .finish()
    }
}
