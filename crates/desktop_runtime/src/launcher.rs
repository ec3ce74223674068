//! Launch orchestration: focus an existing instance or load, initialize, and open a new one.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use desktop_app_contract::{
    AppContext, AppId, LaunchOptions, OpenRequest, WindowId, WindowManager,
};
use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::{
    dispatch::OpenDispatch,
    error::{LaunchError, LoadError},
    instances::AppInstance,
    notice::{NoticePresenter, UnavailableNotice},
    shell_state::ShellState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a launch request. Launches never fail with an error value; failures are reported
/// here and logged.
pub enum LaunchOutcome {
    /// An instance was already running; its window was focused or restored.
    Focused {
        /// Window that was brought forward.
        window_id: WindowId,
        /// Whether continuation options were forwarded to the running instance.
        forwarded: bool,
    },
    /// A new instance was initialized, registered, and opened.
    Launched {
        /// Window the instance is known to own, when one could be resolved.
        window_id: Option<WindowId>,
    },
    /// The app is marked unavailable; a notice was presented instead.
    Unavailable,
    /// The launch failed.
    Failed(LaunchError),
}

impl LaunchOutcome {
    /// Returns whether the app is running after the request.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Self::Focused { .. }
                | Self::Launched { .. }
                | Self::Failed(LaunchError::OpenFailure { .. })
        )
    }
}

type PendingLaunch = Shared<LocalBoxFuture<'static, LaunchOutcome>>;

struct LauncherInner {
    state: Rc<ShellState>,
    window_manager: Rc<dyn WindowManager>,
    notices: Rc<dyn NoticePresenter>,
    dispatch: OpenDispatch,
    in_flight: RefCell<HashMap<AppId, PendingLaunch>>,
}

#[derive(Clone)]
/// Public entry point for launching apps.
///
/// Launches are serialized per app id: a request arriving while another launch of the same app
/// is in flight waits for it and then re-runs the existing-instance check, so overlapping
/// requests never create a second instance.
pub struct AppLauncher {
    inner: Rc<LauncherInner>,
}

impl AppLauncher {
    /// Creates a launcher and subscribes it to the window manager's close notifications.
    pub fn new(
        state: Rc<ShellState>,
        window_manager: Rc<dyn WindowManager>,
        notices: Rc<dyn NoticePresenter>,
        dispatch: OpenDispatch,
    ) -> Self {
        let close_state = Rc::clone(&state);
        window_manager.on_window_closed(Rc::new(move |window_id| {
            evict_closed_window(&close_state, window_id);
        }));

        Self {
            inner: Rc::new(LauncherInner {
                state,
                window_manager,
                notices,
                dispatch,
                in_flight: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Shared shell state.
    pub fn state(&self) -> &Rc<ShellState> {
        &self.inner.state
    }

    /// Window manager apps are launched into.
    pub fn window_manager(&self) -> &Rc<dyn WindowManager> {
        &self.inner.window_manager
    }

    /// Close callback: evicts the instance owning `window_id`, if any.
    pub fn on_window_closed(&self, window_id: WindowId) {
        evict_closed_window(&self.inner.state, window_id);
    }

    /// Launches `app_id`, or focuses it when it is already running.
    pub async fn launch_app(&self, app_id: &AppId, options: LaunchOptions) -> LaunchOutcome {
        loop {
            let pending = self.inner.in_flight.borrow().get(app_id).cloned();
            match pending {
                Some(pending) => {
                    pending.await;
                }
                None => break,
            }
        }

        let launcher = self.clone();
        let owned_id = app_id.clone();
        let pending = async move {
            let outcome = launcher.run_launch(&owned_id, &options).await;
            launcher.inner.in_flight.borrow_mut().remove(&owned_id);
            outcome
        }
        .boxed_local()
        .shared();
        self.inner
            .in_flight
            .borrow_mut()
            .insert(app_id.clone(), pending.clone());
        pending.await
    }

    async fn run_launch(&self, app_id: &AppId, options: &LaunchOptions) -> LaunchOutcome {
        match self.try_launch(app_id, options).await {
            Ok(outcome) => outcome,
            Err(LaunchError::AppUnavailable(app_id)) => {
                log::info!("{app_id} is not available yet");
                LaunchOutcome::Unavailable
            }
            Err(err) => {
                log::error!("failed to launch {app_id}: {err}");
                LaunchOutcome::Failed(err)
            }
        }
    }

    async fn try_launch(
        &self,
        app_id: &AppId,
        options: &LaunchOptions,
    ) -> Result<LaunchOutcome, LaunchError> {
        if let Some(outcome) = self.focus_existing(app_id, options).await? {
            return Ok(outcome);
        }

        let state = &self.inner.state;
        if !state.catalog.is_loaded() {
            return Err(LoadError::ManifestUnavailable {
                reason: "app manifest has not been loaded".to_string(),
            }
            .into());
        }
        let descriptor = state
            .catalog
            .get(app_id)
            .ok_or_else(|| LaunchError::AppNotFound(app_id.clone()))?;
        if !descriptor.available {
            self.inner
                .notices
                .present(UnavailableNotice::for_app(&descriptor));
            return Err(LaunchError::AppUnavailable(app_id.clone()));
        }

        let module = state.modules.load(app_id).await?;
        let handle = module.instantiate();

        let context = AppContext {
            window_manager: Rc::clone(&self.inner.window_manager),
            descriptor,
            options: options.clone(),
            catalog: state.catalog.all(),
        };
        if let Err(reason) = handle.init(context).await {
            module.release_singleton();
            return Err(LaunchError::InitializationFailure {
                app_id: app_id.clone(),
                reason,
            });
        }

        state.instances.register(AppInstance::new(
            app_id.clone(),
            module,
            Rc::clone(&handle),
        ))?;

        let request = self.inner.dispatch.request_for(app_id, options);
        handle
            .open(request)
            .await
            .map_err(|reason| LaunchError::OpenFailure {
                app_id: app_id.clone(),
                reason,
            })?;

        let window_id = state
            .instances
            .resolve_window_id(app_id, self.inner.window_manager.as_ref());
        log::info!("launched {app_id}");
        Ok(LaunchOutcome::Launched { window_id })
    }

    /// Brings an existing instance forward, or evicts it when its window is gone.
    async fn focus_existing(
        &self,
        app_id: &AppId,
        options: &LaunchOptions,
    ) -> Result<Option<LaunchOutcome>, LaunchError> {
        let instances = &self.inner.state.instances;
        let Some(instance) = instances.get(app_id) else {
            return Ok(None);
        };

        let window_manager = self.inner.window_manager.as_ref();
        let live_window = instances
            .resolve_window_id(app_id, window_manager)
            .and_then(|window_id| window_manager.window(window_id));
        let Some(window) = live_window else {
            log::info!("{app_id} has no live window; evicting stale instance");
            instances.evict(app_id);
            return Ok(None);
        };

        if window.is_minimized {
            window_manager.restore_window(window.id);
        } else {
            window_manager.focus_window(window.id);
        }
        log::debug!("{app_id} already running in {}", window.id);

        let forwarded = self.forward_options(&instance, options).await?;
        Ok(Some(LaunchOutcome::Focused {
            window_id: window.id,
            forwarded,
        }))
    }

    async fn forward_options(
        &self,
        instance: &AppInstance,
        options: &LaunchOptions,
    ) -> Result<bool, LaunchError> {
        let request = self.inner.dispatch.request_for(&instance.app_id, options);
        let Some(capability) = request.required_capability() else {
            return Ok(false);
        };
        if !instance.handle.supports(capability) {
            log::debug!(
                "{} does not declare {}; options not forwarded",
                instance.app_id,
                capability.token()
            );
            return Ok(false);
        }

        let open_failure = |reason: String| LaunchError::OpenFailure {
            app_id: instance.app_id.clone(),
            reason,
        };
        match request {
            OpenRequest::Path { path } => instance.handle.navigate(&path).map_err(open_failure)?,
            request => instance
                .handle
                .open(request)
                .await
                .map_err(open_failure)?,
        }
        Ok(true)
    }
}

fn evict_closed_window(state: &ShellState, window_id: WindowId) {
    if let Some(app_id) = state.instances.evict_by_window_id(window_id) {
        log::info!("{window_id} closed; cleaned up {app_id}");
    }
}
