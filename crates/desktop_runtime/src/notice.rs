//! "Coming soon" notices shown when an unavailable app is launched.

use std::cell::{Cell, RefCell};

use desktop_app_contract::{AppDescriptor, AppId};

/// Body text of every unavailable-app notice.
pub const UNAVAILABLE_MESSAGE: &str = "This app isn't available yet. It's coming soon!";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Modal notice naming an app that cannot be launched yet.
pub struct UnavailableNotice {
    /// App the notice is about.
    pub app_id: AppId,
    /// Display name shown as the heading.
    pub app_name: String,
    /// Icon shown above the heading.
    pub icon: String,
    /// Body text.
    pub message: String,
}

impl UnavailableNotice {
    /// Builds the notice for `descriptor`.
    pub fn for_app(descriptor: &AppDescriptor) -> Self {
        Self {
            app_id: descriptor.id.clone(),
            app_name: descriptor.name.clone(),
            icon: descriptor.icon.clone(),
            message: UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Ways a user can dismiss a notice.
pub enum NoticeDismissal {
    /// The OK button.
    Confirm,
    /// A click on the backdrop outside the dialog.
    ClickOutside,
    /// The Escape key.
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a click inside the notice overlay landed.
pub enum NoticeClickTarget {
    /// The dimmed backdrop around the dialog.
    Backdrop,
    /// The dialog itself.
    Dialog,
}

/// Surface presenting unavailable-app notices to the user.
pub trait NoticePresenter {
    /// Shows `notice`.
    fn present(&self, notice: UnavailableNotice);
}

#[derive(Debug, Default)]
/// Headless modal stack. Each presentation opens a new overlay on top of any already open.
pub struct ModalNoticeBoard {
    open: RefCell<Vec<UnavailableNotice>>,
    presented: Cell<usize>,
}

impl ModalNoticeBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices currently open, oldest first.
    pub fn open_notices(&self) -> Vec<UnavailableNotice> {
        self.open.borrow().clone()
    }

    /// Topmost open notice.
    pub fn current(&self) -> Option<UnavailableNotice> {
        self.open.borrow().last().cloned()
    }

    /// Total number of notices ever presented.
    pub fn presented_count(&self) -> usize {
        self.presented.get()
    }

    /// Dismisses the topmost notice.
    pub fn dismiss(&self, how: NoticeDismissal) -> Option<UnavailableNotice> {
        let dismissed = self.open.borrow_mut().pop();
        if let Some(notice) = &dismissed {
            log::debug!("dismissed notice for {} via {how:?}", notice.app_id);
        }
        dismissed
    }

    /// Handles a click; only backdrop clicks dismiss.
    pub fn click(&self, target: NoticeClickTarget) -> Option<UnavailableNotice> {
        match target {
            NoticeClickTarget::Backdrop => self.dismiss(NoticeDismissal::ClickOutside),
            NoticeClickTarget::Dialog => None,
        }
    }

    /// Handles a key press; only `Escape` dismisses.
    pub fn key_down(&self, key: &str) -> Option<UnavailableNotice> {
        if key == "Escape" {
            self.dismiss(NoticeDismissal::Escape)
        } else {
            None
        }
    }
}

impl NoticePresenter for ModalNoticeBoard {
    fn present(&self, notice: UnavailableNotice) {
        log::info!("{}: {}", notice.app_name, notice.message);
        self.presented.set(self.presented.get() + 1);
        self.open.borrow_mut().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scaffold_notice() -> UnavailableNotice {
        UnavailableNotice::for_app(
            &AppDescriptor::new(AppId::trusted("app7"), "Scaffold", "images/app7.png")
                .unavailable(),
        )
    }

    #[test]
    fn notice_names_the_app() {
        let notice = scaffold_notice();
        assert_eq!(notice.app_name, "Scaffold");
        assert_eq!(notice.message, UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn backdrop_click_and_escape_dismiss_but_dialog_click_does_not() {
        let board = ModalNoticeBoard::new();
        board.present(scaffold_notice());
        board.present(scaffold_notice());

        assert_eq!(board.click(NoticeClickTarget::Dialog), None);
        assert_eq!(board.key_down("Enter"), None);
        assert_eq!(board.open_notices().len(), 2);

        assert!(board.click(NoticeClickTarget::Backdrop).is_some());
        assert!(board.key_down("Escape").is_some());
        assert_eq!(board.current(), None);
        assert_eq!(board.dismiss(NoticeDismissal::Confirm), None);
        assert_eq!(board.presented_count(), 2);
    }
}
