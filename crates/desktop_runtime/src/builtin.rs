//! Apps compiled into the shell.

use desktop_app_contract::AppId;
use platform_host::StaticModuleSource;

/// Files browser app id.
pub const FILES_APP_ID: &str = "app1";
/// Notes editor app id.
pub const NOTES_APP_ID: &str = "app3";
/// Prism media player app id.
pub const MEDIA_APP_ID: &str = "app5";

/// Module source with the built-in units registered under their stock app ids.
pub fn builtin_module_source() -> StaticModuleSource {
    let source = StaticModuleSource::new();
    source.register_module(AppId::trusted(FILES_APP_ID), desktop_app_files::module());
    source.register_module(AppId::trusted(NOTES_APP_ID), desktop_app_notes::module());
    source.register_module(AppId::trusted(MEDIA_APP_ID), desktop_app_media::module());
    source
}
