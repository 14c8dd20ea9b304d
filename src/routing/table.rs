//! Route table module
//!
//! Exact-path routing over a table built once at startup.

use hyper::Method;

use crate::handler::endpoints;
use crate::handler::HandlerFn;

/// A (method set, exact path) registration pointing at a handler
#[derive(Clone)]
pub struct Route {
    /// Short name used in logs
    pub name: &'static str,
    pub path: String,
    pub methods: Vec<Method>,
    pub handler: HandlerFn,
    /// Bracket each call with "received" / "sending" info entries
    pub log_activity: bool,
}

impl Route {
    pub fn new(name: &'static str, path: &str, methods: &[Method], handler: HandlerFn) -> Self {
        Self {
            name,
            path: path.to_string(),
            methods: methods.to_vec(),
            handler,
            log_activity: false,
        }
    }

    /// Enable request/response activity logging for this route
    #[must_use]
    pub const fn logged(mut self) -> Self {
        self.log_activity = true;
        self
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Human readable form, e.g. `GET|POST /api/hello`
    pub fn describe(&self) -> String {
        let methods: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
        format!("{} {}", methods.join("|"), self.path)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("methods", &self.methods)
            .field("log_activity", &self.log_activity)
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable set of routes
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Append a route; earlier registrations win on duplicate paths
    #[must_use]
    pub fn with(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// The service's fixed routes
    pub fn standard() -> Self {
        Self::new()
            .with(Route::new("root", "/", &[Method::GET, Method::POST], endpoints::root).logged())
            .with(
                Route::new(
                    "api_hello",
                    "/api/hello",
                    &[Method::GET, Method::POST],
                    endpoints::api_hello,
                )
                .logged(),
            )
            .with(Route::new("health", "/health", &[Method::GET], endpoints::health))
    }

    /// Find the route for `method` and `path`
    ///
    /// The first route registered for `path` decides. If it does not accept
    /// `method` the request has no route; there is no separate 405 outcome.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.path == path)
            .filter(|route| route.allows(method))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
