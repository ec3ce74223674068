//! Prism media player: keeps a playlist of opened tracks and shows what is playing.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use desktop_app_contract::{
    AppCapability, AppContext, AppFuture, AppHandle, AppModule, OpenRequest, WindowConfig,
    WindowId,
};

/// Entry point the Prism unit defines.
pub const ENTRY_POINT: &str = "PrismApp";
/// Window title.
pub const WINDOW_TITLE: &str = "Prism - Music Player";

const CAPABILITIES: &[AppCapability] = &[AppCapability::MediaOpenable];

/// Module definition for the Prism player.
pub fn module() -> AppModule {
    AppModule::singleton(ENTRY_POINT, || Rc::new(PrismApp::new()) as Rc<dyn AppHandle>)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A playlist entry.
pub struct Track {
    /// File name, extension included.
    pub name: String,
    /// Location the track is played from.
    pub path: String,
    /// Display title: the file name without its extension.
    pub title: String,
}

impl Track {
    /// Builds a track. A missing name is taken from the last path segment.
    pub fn new(name: Option<&str>, path: &str) -> Self {
        let name = match name.filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => path.rsplit('/').next().unwrap_or(path).to_string(),
        };
        let title = match name.rfind('.') {
            Some(idx) if idx > 0 => name[..idx].to_string(),
            _ => name.clone(),
        };
        Self {
            name,
            path: path.to_string(),
            title,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    /// Selects `track`, appending it unless a track with the same path is already queued.
    fn load(&mut self, track: Track) {
        match self.tracks.iter().position(|t| t.path == track.path) {
            Some(idx) => self.current = Some(idx),
            None => {
                self.tracks.push(track);
                self.current = Some(self.tracks.len() - 1);
            }
        }
    }

    fn now_playing(&self) -> Option<&Track> {
        self.tracks.get(self.current?)
    }

    fn footer_text(&self) -> String {
        match self.now_playing() {
            Some(track) => format!("Playing: {} | {} tracks", track.title, self.tracks.len()),
            None => format!("{} tracks in playlist", self.tracks.len()),
        }
    }

    fn body(&self) -> String {
        match self.now_playing() {
            Some(track) => format!("Now playing: {}\n{}", track.title, track.path),
            None => "Nothing playing".to_string(),
        }
    }
}

/// Headless media player.
pub struct PrismApp {
    context: RefCell<Option<AppContext>>,
    window: Cell<Option<WindowId>>,
    playlist: RefCell<Playlist>,
}

impl Default for PrismApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PrismApp {
    /// Creates a player with an empty playlist.
    pub fn new() -> Self {
        Self {
            context: RefCell::new(None),
            window: Cell::new(None),
            playlist: RefCell::new(Playlist::default()),
        }
    }

    /// Track currently selected.
    pub fn now_playing(&self) -> Option<Track> {
        self.playlist.borrow().now_playing().cloned()
    }

    /// Every queued track in insertion order.
    pub fn tracks(&self) -> Vec<Track> {
        self.playlist.borrow().tracks.clone()
    }

    fn refresh_window(&self, context: &AppContext, window_id: WindowId) {
        let (body, footer) = {
            let playlist = self.playlist.borrow();
            (playlist.body(), playlist.footer_text())
        };
        context.window_manager.update_content(window_id, &body);
        context.window_manager.update_footer(window_id, &footer);
    }
}

impl AppHandle for PrismApp {
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
                .ok_or_else(|| "Prism was opened before init".to_string())?;

            if let OpenRequest::Media {
                file_name,
                file_path: Some(file_path),
            } = &request
            {
                self.playlist
                    .borrow_mut()
                    .load(Track::new(file_name.as_deref(), file_path));
            }

            let live_window = self
                .window
                .get()
                .filter(|id| context.window_manager.window(*id).is_some());
            if let Some(window_id) = live_window {
                self.refresh_window(&context, window_id);
                return Ok(());
            }

            let (body, footer) = {
                let playlist = self.playlist.borrow();
                (playlist.body(), playlist.footer_text())
            };
            let window = context.window_manager.create_window(
                WindowConfig::new(WINDOW_TITLE)
                    .with_app(context.descriptor.id.clone())
                    .with_icon(context.descriptor.icon.clone())
                    .with_content(body)
                    .with_footer(footer)
                    .with_class_name("prism-app-window"),
            );
            self.window.set(Some(window.id));
            Ok(())
        })
    }

    fn window_id(&self) -> Option<WindowId> {
        self.window.get()
    }
}
