//! Universal launcher: opens apps, folders, and files from desktop icons or the Files app.

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{
    AppId, LaunchOptions, OPTION_CONTENT, OPTION_FILE_NAME, OPTION_FILE_PATH, OPTION_PATH,
};
use platform_host::FileContentSource;
use serde_json::Value;

use crate::{
    builtin::{FILES_APP_ID, MEDIA_APP_ID, NOTES_APP_ID},
    launcher::{AppLauncher, LaunchOutcome},
};

/// Option key naming the root files are resolved against.
pub const OPTION_BASE_PATH: &str = "basePath";
/// Option key naming the folder, relative to the base path, the file was opened from.
pub const OPTION_CURRENT_PATH: &str = "currentPath";

const DEFAULT_BASE_PATH: &str = "home";
const HOME_LOCATION: &str = "Home";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Something a user can double-click.
pub enum LaunchItem {
    /// An app, by id.
    App(AppId),
    /// A folder, opened in the Files app.
    Folder {
        /// Folder name or path.
        name: String,
    },
    /// A file, opened by the handler registered for its extension.
    File {
        /// File name, extension included.
        name: String,
    },
}

impl LaunchItem {
    /// Normalizes loosely shaped item data.
    ///
    /// A string is an app id. Objects are folders when `isDirectory` is true or `type` is
    /// `folder`, apps when `type` is `app` or `appId` is set, and files when `type` is `file` or
    /// a `name` is present.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let object = match value {
            Value::String(raw) => return AppId::new(raw.as_str()).map(Self::App),
            Value::Object(object) => object,
            other => return Err(format!("unsupported launch item: {other}")),
        };

        let field = |key: &str| object.get(key).and_then(Value::as_str);
        let kind = field("type");

        if object.get("isDirectory").and_then(Value::as_bool) == Some(true)
            || kind == Some("folder")
        {
            let name = field("name").or_else(|| field("path")).unwrap_or_default();
            return Ok(Self::Folder {
                name: name.to_string(),
            });
        }
        if kind == Some("app") || object.contains_key("appId") {
            let raw = field("appId")
                .or_else(|| field("id"))
                .ok_or_else(|| "app launch item has no app id".to_string())?;
            return AppId::new(raw).map(Self::App);
        }
        if kind == Some("file") || object.contains_key("name") {
            let name = field("name").unwrap_or_default();
            if name.is_empty() {
                return Err("file launch item has no name".to_string());
            }
            return Ok(Self::File {
                name: name.to_string(),
            });
        }
        Err(format!("unknown launch item: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a file handler does with a matching file.
pub enum FileAction {
    /// Read the file as text and open it with `fileName` and `content`.
    OpenText,
    /// Open it with `fileName` and `filePath`.
    PlayMedia,
    /// Recognized but not openable yet.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// File-type handler keyed by extension.
pub struct FileHandler {
    /// Handler name, such as `text`.
    pub kind: String,
    /// Lowercase extensions without the dot.
    pub extensions: Vec<String>,
    /// App the file is opened in.
    pub app_id: Option<AppId>,
    /// How the file is handed to the app.
    pub action: FileAction,
}

impl FileHandler {
    /// Creates a handler.
    pub fn new(
        kind: impl Into<String>,
        extensions: &[&str],
        app_id: Option<AppId>,
        action: FileAction,
    ) -> Self {
        Self {
            kind: kind.into(),
            extensions: extensions.iter().map(|ext| ext.to_ascii_lowercase()).collect(),
            app_id,
            action,
        }
    }

    fn matches(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }
}

fn default_handlers() -> Vec<FileHandler> {
    vec![
        FileHandler::new(
            "text",
            &["txt", "md", "markdown", "json", "js", "css", "html", "xml", "csv", "log"],
            Some(AppId::trusted(NOTES_APP_ID)),
            FileAction::OpenText,
        ),
        FileHandler::new(
            "image",
            &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"],
            None,
            FileAction::Unsupported,
        ),
        FileHandler::new(
            "audio",
            &["mp3", "wav", "ogg", "m4a", "flac"],
            Some(AppId::trusted(MEDIA_APP_ID)),
            FileAction::PlayMedia,
        ),
    ]
}

/// Lowercase text after the last dot; the whole name when there is no dot.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_ascii_lowercase()
}

/// Builds the path a file is read from, using `basePath` (default `home`) and `currentPath`.
pub fn build_file_path(file_name: &str, options: &LaunchOptions) -> String {
    let base = options
        .get_str(OPTION_BASE_PATH)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_BASE_PATH);
    match options.get_str(OPTION_CURRENT_PATH) {
        Some(current) if !current.is_empty() && current != HOME_LOCATION => {
            format!("{base}/{current}/{file_name}").replacen("//", "/", 1)
        }
        _ => format!("{base}/{file_name}"),
    }
}

fn unreadable_placeholder(file_name: &str) -> String {
    format!("# {file_name}\n\nFile content could not be loaded.")
}

/// Routes [`LaunchItem`]s to the right app through an [`AppLauncher`].
pub struct UniversalLauncher {
    launcher: AppLauncher,
    files: Rc<dyn FileContentSource>,
    handlers: RefCell<Vec<FileHandler>>,
}

impl UniversalLauncher {
    /// Creates a launcher with the stock text, image, and audio handlers.
    pub fn new(launcher: AppLauncher, files: Rc<dyn FileContentSource>) -> Self {
        Self {
            launcher,
            files,
            handlers: RefCell::new(default_handlers()),
        }
    }

    /// Registers `handler`, replacing any handler of the same kind.
    pub fn register_file_handler(&self, handler: FileHandler) {
        let mut handlers = self.handlers.borrow_mut();
        match handlers.iter_mut().find(|existing| existing.kind == handler.kind) {
            Some(existing) => *existing = handler,
            None => handlers.push(handler),
        }
    }

    /// First handler claiming `extension`.
    pub fn handler_for(&self, extension: &str) -> Option<FileHandler> {
        self.handlers
            .borrow()
            .iter()
            .find(|handler| handler.matches(extension))
            .cloned()
    }

    /// Launches `item`. Returns whether the item was handled.
    ///
    /// `options` are forwarded to app launches and supply `basePath`/`currentPath` for files.
    pub async fn launch(&self, item: &LaunchItem, options: LaunchOptions) -> bool {
        match item {
            LaunchItem::App(app_id) => {
                log::info!("launching app {app_id}");
                self.launch_with(app_id, options).await
            }
            LaunchItem::Folder { name } => {
                log::info!("opening folder `{name}`");
                let folder = LaunchOptions::new().with(OPTION_PATH, name.as_str());
                self.launch_with(&AppId::trusted(FILES_APP_ID), folder)
                    .await
            }
            LaunchItem::File { name } => self.launch_file(name, &options).await,
        }
    }

    async fn launch_file(&self, file_name: &str, options: &LaunchOptions) -> bool {
        let extension = file_extension(file_name);
        let Some(handler) = self.handler_for(&extension) else {
            log::warn!("no handler for file type .{extension}");
            return false;
        };
        let Some(app_id) = handler.app_id.clone() else {
            log::info!("{} files cannot be opened yet", handler.kind);
            return false;
        };

        let path = build_file_path(file_name, options);
        let launch_options = match handler.action {
            FileAction::OpenText => LaunchOptions::new()
                .with(OPTION_FILE_NAME, file_name)
                .with(OPTION_CONTENT, self.read_text(file_name, &path).await),
            FileAction::PlayMedia => LaunchOptions::new()
                .with(OPTION_FILE_NAME, file_name)
                .with(OPTION_FILE_PATH, path),
            FileAction::Unsupported => {
                log::info!("{} files cannot be opened yet", handler.kind);
                return false;
            }
        };
        log::info!("opening `{file_name}` in {app_id}");
        self.launch_with(&app_id, launch_options).await
    }

    async fn read_text(&self, file_name: &str, path: &str) -> String {
        match self.files.read_text(path).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::warn!("could not fetch `{path}`; opening empty");
                String::new()
            }
            Err(err) => {
                log::warn!("could not read `{path}`: {err}");
                unreadable_placeholder(file_name)
            }
        }
    }

    async fn launch_with(&self, app_id: &AppId, options: LaunchOptions) -> bool {
        !matches!(
            self.launcher.launch_app(app_id, options).await,
            LaunchOutcome::Failed(_)
        )
    }
}
