//! Process-lifetime shell state shared by the launcher and its collaborators.

use std::rc::Rc;

use platform_host::{ManifestSource, ModuleSource};

use crate::{
    catalog::AppCatalog, config::ShellConfig, error::LoadError, instances::AppInstanceRegistry,
    module_loader::ModuleLoader,
};

/// Explicitly owned registries: app catalog, module cache, and live instances.
///
/// One value lives from shell start to shell exit and is injected into the
/// [`crate::launcher::AppLauncher`].
pub struct ShellState {
    /// Descriptor registry.
    pub catalog: AppCatalog,
    /// Module loader and cache.
    pub modules: ModuleLoader,
    /// Live instance registry.
    pub instances: AppInstanceRegistry,
}

impl ShellState {
    /// Creates state from already constructed collaborators.
    pub fn new(catalog: AppCatalog, modules: ModuleLoader) -> Self {
        Self {
            catalog,
            modules,
            instances: AppInstanceRegistry::new(),
        }
    }

    /// Creates state wired to `config`'s entry-point naming.
    pub fn from_config(
        config: &ShellConfig,
        manifests: Rc<dyn ManifestSource>,
        modules: Rc<dyn ModuleSource>,
    ) -> Self {
        Self::new(
            AppCatalog::new(manifests),
            ModuleLoader::new(modules, config.entry_point_names()),
        )
    }

    /// Loads the app catalog. See [`AppCatalog::load`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::ManifestUnavailable`] when the manifest cannot be loaded.
    pub async fn load_catalog(&self) -> Result<(), LoadError> {
        self.catalog.load().await
    }
}
