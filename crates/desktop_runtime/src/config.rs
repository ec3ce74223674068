//! Shell configuration: manifest location, content root, entry-point naming, and open routing.

use std::{collections::BTreeMap, path::PathBuf};

use desktop_app_contract::AppId;
use serde::{Deserialize, Serialize};

/// Built-in entry-point names for the stock app ids.
const DEFAULT_ENTRY_POINTS: &[(&str, &str)] = &[
    ("app1", "FilesApp"),
    ("app2", "SettingsApp"),
    ("app3", "NotesApp"),
    ("app4", "WeatherApp"),
    ("app5", "PrismApp"),
    ("app6", "CalculatorApp"),
    ("app7", "ScaffoldApp"),
    ("app8", "ClockApp"),
    ("app9", "ScheduleApp"),
    ("app10", "AvokadooApp"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// Option shape an app expects from [`crate::launcher::AppLauncher::launch_app`].
pub enum OpenRoute {
    /// Options are ignored; the app opens with no arguments.
    #[default]
    Default,
    /// `{path}` for folder browsers.
    Path,
    /// `{fileName, content}` for text editors.
    File,
    /// `{fileName, filePath}` for media players.
    Media,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Top-level shell configuration, typically loaded from `shell.toml`.
pub struct ShellConfig {
    /// Location of the JSON app manifest.
    pub manifest_path: PathBuf,
    /// Root directory virtual file paths resolve against.
    pub content_root: PathBuf,
    /// Entry-point name overrides keyed by app id.
    pub entry_points: BTreeMap<AppId, String>,
    /// Open-route overrides keyed by app id.
    pub open_routes: BTreeMap<AppId, OpenRoute>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("apps.json"),
            content_root: PathBuf::from("."),
            entry_points: BTreeMap::new(),
            open_routes: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// Entry-point naming table with this config's overrides applied.
    pub fn entry_point_names(&self) -> EntryPointNames {
        let mut names = EntryPointNames::default();
        for (app_id, entry_point) in &self.entry_points {
            names.set(app_id.clone(), entry_point.clone());
        }
        names
    }

    /// Open-route table with this config's overrides applied.
    pub fn open_route_table(&self) -> OpenRouteTable {
        let mut table = OpenRouteTable::default();
        for (app_id, route) in &self.open_routes {
            table.set(app_id.clone(), *route);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Naming convention mapping app ids to the symbol their unit defines.
pub struct EntryPointNames {
    names: BTreeMap<AppId, String>,
}

impl Default for EntryPointNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_ENTRY_POINTS
                .iter()
                .map(|(id, name)| (AppId::trusted(*id), (*name).to_string()))
                .collect(),
        }
    }
}

impl EntryPointNames {
    /// Overrides the entry point for `app_id`.
    pub fn set(&mut self, app_id: AppId, entry_point: impl Into<String>) {
        self.names.insert(app_id, entry_point.into());
    }

    /// Resolves the entry-point name, falling back to `<Capitalized id>App`.
    pub fn resolve(&self, app_id: &AppId) -> String {
        if let Some(name) = self.names.get(app_id) {
            return name.clone();
        }
        let mut chars = app_id.as_str().chars();
        match chars.next() {
            Some(first) => format!("{}{}App", first.to_ascii_uppercase(), chars.as_str()),
            None => "App".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Dispatch table deciding which option keys each app receives.
pub struct OpenRouteTable {
    routes: BTreeMap<AppId, OpenRoute>,
}

impl Default for OpenRouteTable {
    fn default() -> Self {
        Self {
            routes: [
                (AppId::trusted("app1"), OpenRoute::Path),
                (AppId::trusted("app3"), OpenRoute::File),
                (AppId::trusted("app5"), OpenRoute::Media),
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl OpenRouteTable {
    /// Overrides the route for `app_id`.
    pub fn set(&mut self, app_id: AppId, route: OpenRoute) {
        self.routes.insert(app_id, route);
    }

    /// Route for `app_id`; unlisted apps use [`OpenRoute::Default`].
    pub fn route(&self, app_id: &AppId) -> OpenRoute {
        self.routes.get(app_id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entry_points_follow_builtin_table_then_naming_fallback() {
        let names = EntryPointNames::default();
        assert_eq!(names.resolve(&AppId::trusted("app3")), "NotesApp");
        assert_eq!(names.resolve(&AppId::trusted("app10")), "AvokadooApp");
        assert_eq!(names.resolve(&AppId::trusted("journal")), "JournalApp");
    }

    #[test]
    fn config_overrides_layer_on_top_of_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
            manifest_path = "config/apps.json"

            [entry_points]
            app3 = "MarkdownApp"

            [open_routes]
            app7 = "file"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.manifest_path, PathBuf::from("config/apps.json"));
        assert_eq!(config.content_root, PathBuf::from("."));
        assert_eq!(
            config.entry_point_names().resolve(&AppId::trusted("app3")),
            "MarkdownApp"
        );

        let routes = config.open_route_table();
        assert_eq!(routes.route(&AppId::trusted("app1")), OpenRoute::Path);
        assert_eq!(routes.route(&AppId::trusted("app7")), OpenRoute::File);
        assert_eq!(routes.route(&AppId::trusted("app8")), OpenRoute::Default);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ShellConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config, ShellConfig::default());
    }
}
