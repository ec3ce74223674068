#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use desktop_app_contract::{
    AppCapability, AppContext, AppFuture, AppHandle, AppId, AppModule, OpenRequest,
    WindowClosedListener, WindowConfig, WindowId, WindowManager, WindowSnapshot,
};
use desktop_runtime::{
    AppCatalog, AppLauncher, DesktopWindowManager, EntryPointNames, ModalNoticeBoard,
    ModuleLoader, OpenDispatch, ShellState,
};
use futures::{channel::oneshot, executor::block_on};
use platform_host::{
    MemoryManifestSource, ModuleSource, ModuleSourceFuture, StaticModuleSource, SymbolTable,
};

pub const MANIFEST: &str = r#"{"apps":[
    {"id":"app1","name":"Files","icon":"images/app1.png"},
    {"id":"app3","name":"Notes","icon":"images/app3.png"},
    {"id":"app4","name":"Weather","icon":"images/app4.png"},
    {"id":"app5","name":"Prism","icon":"images/app5.png"},
    {"id":"app7","name":"Scaffold","icon":"images/app7.png","available":false}
]}"#;

pub fn app(id: &str) -> AppId {
    AppId::trusted(id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WmCall {
    Create(Option<AppId>),
    Focus(WindowId),
    Minimize(WindowId),
    Restore(WindowId),
    Close(WindowId),
}

/// Window manager that records every call and can drop windows without notifying listeners.
#[derive(Default)]
pub struct RecordingWindowManager {
    inner: DesktopWindowManager,
    listeners: RefCell<Vec<WindowClosedListener>>,
    calls: RefCell<Vec<WmCall>>,
}

impl RecordingWindowManager {
    pub fn calls(&self) -> Vec<WmCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn focus_and_restore_calls(&self) -> Vec<WmCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, WmCall::Focus(_) | WmCall::Restore(_)))
            .collect()
    }

    /// Removes a window while skipping the close notification.
    pub fn close_silently(&self, window_id: WindowId) {
        self.inner.close_window(window_id);
    }

    fn record(&self, call: WmCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl WindowManager for RecordingWindowManager {
    fn create_window(&self, config: WindowConfig) -> WindowSnapshot {
        self.record(WmCall::Create(config.app_id.clone()));
        self.inner.create_window(config)
    }

    fn window(&self, window_id: WindowId) -> Option<WindowSnapshot> {
        self.inner.window(window_id)
    }

    fn windows(&self) -> Vec<WindowSnapshot> {
        self.inner.windows()
    }

    fn focus_window(&self, window_id: WindowId) {
        self.record(WmCall::Focus(window_id));
        self.inner.focus_window(window_id);
    }

    fn minimize_window(&self, window_id: WindowId) {
        self.record(WmCall::Minimize(window_id));
        self.inner.minimize_window(window_id);
    }

    fn restore_window(&self, window_id: WindowId) {
        self.record(WmCall::Restore(window_id));
        self.inner.restore_window(window_id);
    }

    fn close_window(&self, window_id: WindowId) {
        self.record(WmCall::Close(window_id));
        if self.inner.window(window_id).is_none() {
            return;
        }
        self.inner.close_window(window_id);
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(window_id);
        }
    }

    fn update_footer(&self, window_id: WindowId, text: &str) {
        self.inner.update_footer(window_id, text);
    }

    fn update_title(&self, window_id: WindowId, title: &str) {
        self.inner.update_title(window_id, title);
    }

    fn update_content(&self, window_id: WindowId, content: &str) {
        self.inner.update_content(window_id, content);
    }

    fn on_window_closed(&self, listener: WindowClosedListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

/// Counters shared by every instance a [`scripted_module`] builds.
#[derive(Default)]
pub struct AppLog {
    pub built: Cell<usize>,
    pub inits: Cell<usize>,
    pub opens: RefCell<Vec<OpenRequest>>,
    pub navigations: RefCell<Vec<String>>,
}

#[derive(Clone, Copy)]
pub struct Script {
    pub capabilities: &'static [AppCapability],
    /// Whether the app reports its window through `window_id()`.
    pub tracks_window: bool,
    pub fail_init: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            capabilities: &[],
            tracks_window: true,
            fail_init: false,
        }
    }
}

struct ScriptedApp {
    app_id: AppId,
    script: Script,
    log: Rc<AppLog>,
    window_manager: RefCell<Option<Rc<dyn WindowManager>>>,
    window: Cell<Option<WindowId>>,
}

impl AppHandle for ScriptedApp {
    fn capabilities(&self) -> &[AppCapability] {
        self.script.capabilities
    }

    fn init(&self, context: AppContext) -> AppFuture<'_, Result<(), String>> {
        Box::pin(async move {
            self.log.inits.set(self.log.inits.get() + 1);
            if self.script.fail_init {
                return Err("init refused".to_string());
            }
            *self.window_manager.borrow_mut() = Some(context.window_manager);
            Ok(())
        })
    }

    fn open(&self, request: OpenRequest) -> AppFuture<'_, Result<(), String>> {
        Box::pin(async move {
            self.log.opens.borrow_mut().push(request);
            let window_manager = self.window_manager.borrow().clone();
            let Some(window_manager) = window_manager else {
                return Err("not initialized".to_string());
            };
            let live = self
                .window
                .get()
                .and_then(|id| window_manager.window(id));
            if live.is_none() {
                let window = window_manager.create_window(
                    WindowConfig::new(self.app_id.as_str()).with_app(self.app_id.clone()),
                );
                self.window.set(Some(window.id));
            }
            Ok(())
        })
    }

    fn navigate(&self, path: &str) -> Result<(), String> {
        self.log.navigations.borrow_mut().push(path.to_string());
        Ok(())
    }

    fn window_id(&self) -> Option<WindowId> {
        if self.script.tracks_window {
            self.window.get()
        } else {
            None
        }
    }
}

pub fn scripted_module(
    app_id: &str,
    entry_point: &str,
    singleton: bool,
    script: Script,
) -> (AppModule, Rc<AppLog>) {
    let log = Rc::new(AppLog::default());
    let factory_log = log.clone();
    let app_id = app(app_id);
    let factory = move || {
        factory_log.built.set(factory_log.built.get() + 1);
        Rc::new(ScriptedApp {
            app_id: app_id.clone(),
            script,
            log: factory_log.clone(),
            window_manager: RefCell::new(None),
            window: Cell::new(None),
        }) as Rc<dyn AppHandle>
    };
    let module = if singleton {
        AppModule::singleton(entry_point, factory)
    } else {
        AppModule::transient(entry_point, factory)
    };
    (module, log)
}

/// Module source whose first execution waits until the returned sender fires.
pub struct GatedModuleSource {
    pub inner: StaticModuleSource,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl GatedModuleSource {
    pub fn new(inner: StaticModuleSource) -> (Self, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        (
            Self {
                inner,
                gate: RefCell::new(Some(gate)),
            },
            release,
        )
    }
}

impl ModuleSource for GatedModuleSource {
    fn execute<'a>(
        &'a self,
        app_id: &'a AppId,
        symbols: &'a SymbolTable,
    ) -> ModuleSourceFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.inner.execute(app_id, symbols).await
        })
    }
}

pub struct Shell {
    pub launcher: AppLauncher,
    pub window_manager: Rc<RecordingWindowManager>,
    pub notices: Rc<ModalNoticeBoard>,
}

impl Shell {
    pub fn with_source(source: Rc<dyn ModuleSource>) -> Self {
        let state = Rc::new(ShellState::new(
            AppCatalog::new(Rc::new(MemoryManifestSource::new(MANIFEST))),
            ModuleLoader::new(source, EntryPointNames::default()),
        ));
        block_on(state.load_catalog()).expect("load catalog");

        let window_manager = Rc::new(RecordingWindowManager::default());
        let notices = Rc::new(ModalNoticeBoard::new());
        let launcher = AppLauncher::new(
            state,
            window_manager.clone(),
            notices.clone(),
            OpenDispatch::default(),
        );
        Self {
            launcher,
            window_manager,
            notices,
        }
    }

    pub fn instance_count(&self, app_id: &str) -> usize {
        usize::from(self.launcher.state().instances.has(&app(app_id)))
    }
}
