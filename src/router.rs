//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Middleware is not the
//! router's business: compose it with a [`Chain`](crate::middleware::Chain)
//! and register the resulting endpoint like any handler.

use std::collections::HashMap;

use matchit::Router as MatchitRouter;

use crate::handler::{Endpoint, Handler};
use crate::method::Method;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Endpoint>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use stitch::{Method, Request, Response, Router};
    /// # async fn show_snippet(_: Request) -> Response { Response::text("") }
    /// # async fn create_snippet_form(_: Request) -> Response { Response::text("") }
    /// # async fn create_snippet(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/snippet/view/{id}", show_snippet)
    ///     .on(Method::Get,  "/snippet/create",    create_snippet_form)
    ///     .on(Method::Post, "/snippet/create",    create_snippet);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Endpoint::new(handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    /// Finds the endpoint for `method` + `path`, with the captured path parameters.
    pub fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(Endpoint, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value.clone(), params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
