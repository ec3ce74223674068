//! Window-manager contract consumed by the launcher and by apps that own a window.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::AppId;

/// Opaque identifier of a managed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Window creation request.
pub struct WindowConfig {
    /// Title bar text.
    pub title: String,
    /// Title bar and taskbar icon.
    pub icon: String,
    /// App that owns the window. Windows tagged with an app id are unique per app.
    pub app_id: Option<AppId>,
    /// Initial body content.
    pub content: String,
    /// Initial footer text.
    pub footer_text: String,
    /// Extra class name for the host renderer.
    pub class_name: String,
    /// Whether the window may be resized.
    pub resizable: bool,
    /// Whether the window may be minimized.
    pub minimizable: bool,
    /// Whether the window may be maximized.
    pub maximizable: bool,
    /// Whether the window shows a close control.
    pub closable: bool,
}

impl WindowConfig {
    /// Creates a config with the host defaults and the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Tags the window with its owning app.
    pub fn with_app(mut self, app_id: AppId) -> Self {
        self.app_id = Some(app_id);
        self
    }

    /// Sets the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Sets the initial body content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the initial footer text.
    pub fn with_footer(mut self, footer_text: impl Into<String>) -> Self {
        self.footer_text = footer_text.into();
        self
    }

    /// Sets the host class name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Untitled Window".to_string(),
            icon: "images/icon.png".to_string(),
            app_id: None,
            content: String::new(),
            footer_text: String::new(),
            class_name: String::new(),
            resizable: true,
            minimizable: true,
            maximizable: true,
            closable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Point-in-time view of a managed window.
pub struct WindowSnapshot {
    /// Window id.
    pub id: WindowId,
    /// Owning app, when tagged.
    pub app_id: Option<AppId>,
    /// Title bar text.
    pub title: String,
    /// Body content.
    pub content: String,
    /// Footer text.
    pub footer_text: String,
    /// Whether the window is minimized.
    pub is_minimized: bool,
    /// Whether the window has focus.
    pub is_focused: bool,
    /// Stacking order; higher is on top.
    pub z_index: u32,
}

/// Callback invoked after a window has been closed.
pub type WindowClosedListener = Rc<dyn Fn(WindowId)>;

/// On-screen window owner.
///
/// Ids handed out by a window manager may dangle at any time; callers re-check with
/// [`WindowManager::window`] before acting on one.
pub trait WindowManager {
    /// Creates a window and returns its initial snapshot.
    fn create_window(&self, config: WindowConfig) -> WindowSnapshot;

    /// Returns the window when it is still open.
    fn window(&self, window_id: WindowId) -> Option<WindowSnapshot>;

    /// All open windows, bottom of the stack first.
    fn windows(&self) -> Vec<WindowSnapshot>;

    /// Focuses and raises a window.
    fn focus_window(&self, window_id: WindowId);

    /// Minimizes a window.
    fn minimize_window(&self, window_id: WindowId);

    /// Restores a minimized window and focuses it.
    fn restore_window(&self, window_id: WindowId);

    /// Closes a window and notifies close listeners.
    fn close_window(&self, window_id: WindowId);

    /// Replaces the footer text.
    fn update_footer(&self, window_id: WindowId, text: &str);

    /// Replaces the title bar text.
    fn update_title(&self, window_id: WindowId, title: &str);

    /// Replaces the body content.
    fn update_content(&self, window_id: WindowId, content: &str);

    /// Registers a listener invoked with the id of every closed window.
    fn on_window_closed(&self, listener: WindowClosedListener);

    /// Open windows tagged with `app_id`.
    fn windows_for_app(&self, app_id: &AppId) -> Vec<WindowSnapshot> {
        self.windows()
            .into_iter()
            .filter(|window| window.app_id.as_ref() == Some(app_id))
            .collect()
    }
}
