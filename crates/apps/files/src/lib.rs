//! Files app: a navigable folder browser window with back/forward history.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use desktop_app_contract::{
    AppCapability, AppContext, AppFuture, AppHandle, AppModule, OpenRequest, WindowConfig,
    WindowId,
};

/// Entry point the Files unit defines.
pub const ENTRY_POINT: &str = "FilesApp";
/// Root location shown when no path is requested.
pub const HOME: &str = "Home";

const CAPABILITIES: &[AppCapability] = &[AppCapability::Navigable];

/// Module definition for the Files app. Every launch gets a fresh browser.
pub fn module() -> AppModule {
    AppModule::transient(ENTRY_POINT, || Rc::new(FilesApp::new()) as Rc<dyn AppHandle>)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
}

impl NavigationHistory {
    fn starting_at(path: &str) -> Self {
        Self {
            entries: vec![path.to_string()],
            index: 0,
        }
    }

    fn current(&self) -> &str {
        self.entries
            .get(self.index)
            .map(String::as_str)
            .unwrap_or(HOME)
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

fn normalized_location(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        HOME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn footer_for(item_count: usize) -> String {
    match item_count {
        0 => "Empty folder".to_string(),
        1 => "1 item".to_string(),
        n => format!("{n} items"),
    }
}

/// Headless folder browser.
///
/// The home location lists the apps from the launch catalog; other locations are rendered as
/// plain breadcrumbs.
pub struct FilesApp {
    context: RefCell<Option<AppContext>>,
    window: Cell<Option<WindowId>>,
    history: RefCell<NavigationHistory>,
}

impl Default for FilesApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesApp {
    /// Creates a browser positioned at [`HOME`].
    pub fn new() -> Self {
        Self {
            context: RefCell::new(None),
            window: Cell::new(None),
            history: RefCell::new(NavigationHistory::starting_at(HOME)),
        }
    }

    /// Location currently shown.
    pub fn current_path(&self) -> String {
        self.history.borrow().current().to_string()
    }

    /// Steps back in history. Returns `false` at the oldest entry.
    pub fn back(&self) -> bool {
        let moved = self.history.borrow_mut().back();
        if moved {
            self.render();
        }
        moved
    }

    /// Steps forward in history. Returns `false` at the newest entry.
    pub fn forward(&self) -> bool {
        let moved = self.history.borrow_mut().forward();
        if moved {
            self.render();
        }
        moved
    }

    fn listing(&self) -> Vec<String> {
        if self.current_path() != HOME {
            return Vec::new();
        }
        self.context
            .borrow()
            .as_ref()
            .map(|context| {
                context
                    .catalog
                    .iter()
                    .map(|descriptor| descriptor.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn body(&self) -> String {
        let mut body = format!("Location: {}", self.current_path());
        for entry in self.listing() {
            body.push('\n');
            body.push_str(&entry);
        }
        body
    }

    fn render(&self) {
        let Some(window_id) = self.window.get() else {
            return;
        };
        let Some(window_manager) = self
            .context
            .borrow()
            .as_ref()
            .map(|context| Rc::clone(&context.window_manager))
        else {
            return;
        };
        window_manager.update_content(window_id, &self.body());
        window_manager.update_footer(window_id, &footer_for(self.listing().len()));
    }

    fn open_window(&self, path: &str) -> Result<(), String> {
        let context = self
            .context
            .borrow()
            .clone()
            .ok_or_else(|| "Files app was opened before init".to_string())?;
        *self.history.borrow_mut() = NavigationHistory::starting_at(path);

        let window = context.window_manager.create_window(
            WindowConfig::new("Files")
                .with_app(context.descriptor.id.clone())
                .with_icon(context.descriptor.icon.clone())
                .with_content(self.body())
                .with_footer(footer_for(self.listing().len()))
                .with_class_name("files-app-window"),
        );
        self.window.set(Some(window.id));
        Ok(())
    }
}

impl AppHandle for FilesApp {
    fn capabilities(&self) -> &[AppCapability] {
        CAPABILITIES
    }

    fn init(&self, context: AppContext) -> AppFuture<'_, Result<(), String>> {
        Box::pin(async move {
            *self.context.borrow_mut() = Some(context);
            Ok(())
        })
    }

    fn open(&self, request: OpenRequest) -> AppFuture<'_, Result<(), String>> {
        Box::pin(async move {
            let path = match request {
                OpenRequest::Path { path } => normalized_location(&path),
                _ => HOME.to_string(),
            };
            if self.window.get().is_some() {
                return self.navigate(&path);
            }
            self.open_window(&path)
        })
    }

    fn navigate(&self, path: &str) -> Result<(), String> {
        if self.window.get().is_none() {
            return Err("Files window is not open".to_string());
        }
        let path = normalized_location(path);
        if self.current_path() != path {
            self.history.borrow_mut().push(&path);
        }
        self.render();
        Ok(())
    }

    fn window_id(&self) -> Option<WindowId> {
        self.window.get()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn history_truncates_forward_entries_on_new_navigation() {
        let mut history = NavigationHistory::starting_at(HOME);
        history.push("Documents");
        history.push("Documents/Work");
        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());
        assert_eq!(history.current(), HOME);

        history.push("Music");
        assert!(!history.forward());
        assert_eq!(
            history.entries,
            vec![HOME.to_string(), "Music".to_string()]
        );
    }

    #[test]
    fn locations_are_trimmed_and_default_to_home() {
        assert_eq!(normalized_location(""), HOME);
        assert_eq!(normalized_location("/"), HOME);
        assert_eq!(normalized_location(" /Documents/ "), "Documents");
    }

    #[test]
    fn footer_pluralizes_item_count() {
        assert_eq!(footer_for(0), "Empty folder");
        assert_eq!(footer_for(1), "1 item");
        assert_eq!(footer_for(4), "4 items");
    }

    #[test]
    fn navigation_requires_an_open_window() {
        let app = FilesApp::new();
        assert!(app.navigate("Documents").is_err());
        assert_eq!(app.current_path(), HOME);
        assert!(app.supports(AppCapability::Navigable));
        assert!(!app.supports(AppCapability::FileOpenable));
    }
}
