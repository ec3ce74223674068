//! Routing of free-form launch options into app-specific open requests.

use desktop_app_contract::{AppId, LaunchOptions, OpenRequest};

use crate::config::{OpenRoute, OpenRouteTable};

#[derive(Debug, Clone, Default)]
/// Maps `(app id, options)` to the [`OpenRequest`] the app's `open` receives.
pub struct OpenDispatch {
    routes: OpenRouteTable,
}

impl OpenDispatch {
    /// Creates a dispatcher over `routes`.
    pub fn new(routes: OpenRouteTable) -> Self {
        Self { routes }
    }

    /// Route configured for `app_id`.
    pub fn route(&self, app_id: &AppId) -> OpenRoute {
        self.routes.route(app_id)
    }

    /// Builds the open request for `app_id`.
    ///
    /// Options missing the keys a route needs fall back to [`OpenRequest::Default`].
    pub fn request_for(&self, app_id: &AppId, options: &LaunchOptions) -> OpenRequest {
        route_options(self.route(app_id), options)
    }
}

/// Builds the open request for a single route.
pub fn route_options(route: OpenRoute, options: &LaunchOptions) -> OpenRequest {
    match route {
        OpenRoute::Default => OpenRequest::Default,
        OpenRoute::Path => match options.path() {
            Some(path) => OpenRequest::Path {
                path: path.to_string(),
            },
            None => OpenRequest::Default,
        },
        OpenRoute::File => {
            if options.file_name().is_none() && options.content().is_none() {
                return OpenRequest::Default;
            }
            OpenRequest::File {
                file_name: options.file_name().map(str::to_string),
                content: options.content().map(str::to_string),
            }
        }
        OpenRoute::Media => {
            if options.file_name().is_none() && options.file_path().is_none() {
                return OpenRequest::Default;
            }
            OpenRequest::Media {
                file_name: options.file_name().map(str::to_string),
                file_path: options.file_path().map(str::to_string),
            }
        }
    }
}
