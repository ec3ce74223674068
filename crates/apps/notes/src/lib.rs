//! Notes app: a single text document mirrored into its window.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use desktop_app_contract::{
    AppCapability, AppContext, AppFuture, AppHandle, AppModule, OpenRequest, WindowConfig,
    WindowId,
};

/// Entry point the Notes unit defines.
pub const ENTRY_POINT: &str = "NotesApp";
/// File name of a document that was never opened from disk.
pub const UNTITLED: &str = "Untitled.txt";

const CAPABILITIES: &[AppCapability] = &[AppCapability::FileOpenable];

/// Module definition for the Notes app. The module keeps one editor alive between launches.
pub fn module() -> AppModule {
    AppModule::singleton(ENTRY_POINT, || Rc::new(NotesApp::new()) as Rc<dyn AppHandle>)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The document being edited.
pub struct NoteDocument {
    /// File name shown as the window title.
    pub file_name: String,
    /// Full text.
    pub content: String,
}

impl Default for NoteDocument {
    fn default() -> Self {
        Self {
            file_name: UNTITLED.to_string(),
            content: String::new(),
        }
    }
}

impl NoteDocument {
    /// Word and character counts in the footer format.
    pub fn footer_text(&self) -> String {
        format!(
            "Words: {} | Characters: {}",
            self.content.split_whitespace().count(),
            self.content.chars().count()
        )
    }

    fn apply(&mut self, file_name: Option<String>, content: Option<String>) {
        if let Some(file_name) = file_name.filter(|name| !name.is_empty()) {
            self.file_name = file_name;
        }
        if let Some(content) = content {
            self.content = content;
        }
    }
}

/// Headless text editor. Re-opening it with a file replaces the document in the same window.
pub struct NotesApp {
    context: RefCell<Option<AppContext>>,
    window: Cell<Option<WindowId>>,
    document: RefCell<NoteDocument>,
}

impl Default for NotesApp {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesApp {
    /// Creates an editor holding an empty untitled document.
    pub fn new() -> Self {
        Self {
            context: RefCell::new(None),
            window: Cell::new(None),
            document: RefCell::new(NoteDocument::default()),
        }
    }

    /// Snapshot of the current document.
    pub fn document(&self) -> NoteDocument {
        self.document.borrow().clone()
    }

    fn live_window(&self, context: &AppContext) -> Option<WindowId> {
        let window_id = self.window.get()?;
        context.window_manager.window(window_id).map(|window| window.id)
    }

    fn sync_window(&self) {
        let Some(context) = self.context.borrow().clone() else {
            return;
        };
        let Some(window_id) = self.live_window(&context) else {
            return;
        };
        let document = self.document();
        context.window_manager.update_title(window_id, &document.file_name);
        context.window_manager.update_content(window_id, &document.content);
        context
            .window_manager
            .update_footer(window_id, &document.footer_text());
    }
}

impl AppHandle for NotesApp {
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
            let context = self
                .context
                .borrow()
                .clone()
                .ok_or_else(|| "Notes app was opened before init".to_string())?;

            if let OpenRequest::File { file_name, content } = request {
                self.document.borrow_mut().apply(file_name, content);
            }

            if self.live_window(&context).is_some() {
                self.sync_window();
                return Ok(());
            }

            let document = self.document();
            let window = context.window_manager.create_window(
                WindowConfig::new(document.file_name.clone())
                    .with_app(context.descriptor.id.clone())
                    .with_icon(context.descriptor.icon.clone())
                    .with_content(document.content.clone())
                    .with_footer(document.footer_text())
                    .with_class_name("notes-app-window"),
            );
            self.window.set(Some(window.id));
            Ok(())
        })
    }

    fn window_id(&self) -> Option<WindowId> {
        self.window.get()
    }
}
