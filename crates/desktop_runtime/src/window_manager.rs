//! Headless window manager implementing the stacking and focus rules of the desktop.

use std::cell::RefCell;

use desktop_app_contract::{
    AppId, WindowClosedListener, WindowConfig, WindowId, WindowManager, WindowSnapshot,
};

#[derive(Debug, Clone)]
struct ManagedWindow {
    id: WindowId,
    config: WindowConfig,
    is_minimized: bool,
    is_focused: bool,
    z_index: u32,
}

impl ManagedWindow {
    fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            id: self.id,
            app_id: self.config.app_id.clone(),
            title: self.config.title.clone(),
            content: self.config.content.clone(),
            footer_text: self.config.footer_text.clone(),
            is_minimized: self.is_minimized,
            is_focused: self.is_focused,
            z_index: self.z_index,
        }
    }
}

#[derive(Debug, Default)]
struct WindowStack {
    /// Bottom of the stack first.
    windows: Vec<ManagedWindow>,
    next_window_id: u64,
}

impl WindowStack {
    fn index_of(&self, window_id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == window_id)
    }

    fn find_mut(&mut self, window_id: WindowId) -> Option<&mut ManagedWindow> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    fn window_for_app(&self, app_id: &AppId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| w.config.app_id.as_ref() == Some(app_id))
            .map(|w| w.id)
    }
}

/// Focuses and raises `window_id`, un-minimizing it. Returns `false` for unknown windows.
fn focus_window_internal(stack: &mut WindowStack, window_id: WindowId) -> bool {
    let Some(index) = stack.index_of(window_id) else {
        return false;
    };

    let already_focused_top = index + 1 == stack.windows.len()
        && stack
            .windows
            .get(index)
            .map(|w| w.is_focused && !w.is_minimized)
            .unwrap_or(false);
    if already_focused_top {
        return true;
    }

    for window in &mut stack.windows {
        window.is_focused = false;
    }
    let mut window = stack.windows.remove(index);
    window.is_focused = true;
    window.is_minimized = false;
    stack.windows.push(window);
    normalize_window_stack(stack);
    true
}

/// Normalizes z-index ordering and keeps exactly one focused window when any is visible.
fn normalize_window_stack(stack: &mut WindowStack) {
    let mut has_focused = false;
    for (idx, window) in stack.windows.iter_mut().enumerate() {
        window.z_index = (idx + 1) as u32;
        if window.is_minimized {
            window.is_focused = false;
        }
        if window.is_focused {
            if has_focused {
                window.is_focused = false;
            } else {
                has_focused = true;
            }
        }
    }

    if !has_focused {
        if let Some(last_visible) = stack.windows.iter_mut().rev().find(|w| !w.is_minimized) {
            last_visible.is_focused = true;
        }
    }
}

#[derive(Default)]
/// In-process [`WindowManager`] for headless hosts and tests.
///
/// Windows tagged with an app id are unique per app: creating a second one focuses and returns
/// the existing window. Close listeners run after the window is removed and after all internal
/// borrows are released, so they may call back into the manager.
pub struct DesktopWindowManager {
    stack: RefCell<WindowStack>,
    listeners: RefCell<Vec<WindowClosedListener>>,
}

impl DesktopWindowManager {
    /// Creates an empty window manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently focused window.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.stack
            .borrow()
            .windows
            .iter()
            .find(|w| w.is_focused)
            .map(|w| w.id)
    }

    fn update_config(&self, window_id: WindowId, apply: impl FnOnce(&mut WindowConfig)) {
        if let Some(window) = self.stack.borrow_mut().find_mut(window_id) {
            apply(&mut window.config);
        }
    }
}

impl WindowManager for DesktopWindowManager {
    fn create_window(&self, config: WindowConfig) -> WindowSnapshot {
        let mut stack = self.stack.borrow_mut();

        if let Some(app_id) = &config.app_id {
            if let Some(existing) = stack.window_for_app(app_id) {
                log::debug!("{app_id} already owns {existing}; focusing it");
                focus_window_internal(&mut stack, existing);
                if let Some(index) = stack.index_of(existing) {
                    return stack.windows[index].snapshot();
                }
            }
        }

        stack.next_window_id = stack.next_window_id.saturating_add(1);
        let id = WindowId(stack.next_window_id);
        for window in &mut stack.windows {
            window.is_focused = false;
        }
        stack.windows.push(ManagedWindow {
            id,
            config,
            is_minimized: false,
            is_focused: true,
            z_index: 0,
        });
        normalize_window_stack(&mut stack);
        let top = stack.windows.len() - 1;
        stack.windows[top].snapshot()
    }

    fn window(&self, window_id: WindowId) -> Option<WindowSnapshot> {
        let stack = self.stack.borrow();
        stack
            .index_of(window_id)
            .map(|index| stack.windows[index].snapshot())
    }

    fn windows(&self) -> Vec<WindowSnapshot> {
        self.stack
            .borrow()
            .windows
            .iter()
            .map(ManagedWindow::snapshot)
            .collect()
    }

    fn focus_window(&self, window_id: WindowId) {
        focus_window_internal(&mut self.stack.borrow_mut(), window_id);
    }

    fn minimize_window(&self, window_id: WindowId) {
        let mut stack = self.stack.borrow_mut();
        let Some(window) = stack.find_mut(window_id) else {
            return;
        };
        if !window.config.minimizable {
            return;
        }
        window.is_minimized = true;
        window.is_focused = false;
        normalize_window_stack(&mut stack);
    }

    fn restore_window(&self, window_id: WindowId) {
        focus_window_internal(&mut self.stack.borrow_mut(), window_id);
    }

    fn close_window(&self, window_id: WindowId) {
        {
            let mut stack = self.stack.borrow_mut();
            let Some(index) = stack.index_of(window_id) else {
                return;
            };
            stack.windows.remove(index);
            normalize_window_stack(&mut stack);
        }

        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(window_id);
        }
    }

    fn update_footer(&self, window_id: WindowId, text: &str) {
        self.update_config(window_id, |config| config.footer_text = text.to_string());
    }

    fn update_title(&self, window_id: WindowId, title: &str) {
        self.update_config(window_id, |config| config.title = title.to_string());
    }

    fn update_content(&self, window_id: WindowId, content: &str) {
        self.update_config(window_id, |config| config.content = content.to_string());
    }

    fn on_window_closed(&self, listener: WindowClosedListener) {
        self.listeners.borrow_mut().push(listener);
    }
}
