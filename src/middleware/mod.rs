//! Middleware and the [`Chain`] that composes it.
//!
//! Middleware is anything that turns one [`Endpoint`] into another: it gets
//! the next endpoint in line and returns a new one that does something
//! before and/or after delegating to it. This is the right place for
//! cross-cutting concerns: security headers, request logging, panic
//! recovery, authentication gates.
//!
//! A [`Chain`] is an ordered list of middleware built once at startup and
//! applied to each route's handler:
//!
//! ```rust
//! use stitch::{Method, Request, Response, Router};
//! use stitch::middleware::{Chain, log_request, recover_panic, secure_headers};
//!
//! async fn home(_req: Request) -> Response { Response::html("<h1>Home</h1>") }
//!
//! // recover_panic runs first, then log_request, then secure_headers, then `home`.
//! let standard = Chain::new()
//!     .with(recover_panic)
//!     .with(log_request)
//!     .with(secure_headers);
//!
//! let app = Router::new().on(Method::Get, "/", standard.apply(home));
//! ```
//!
//! Ad-hoc middleware can be written as a plain `fn(Endpoint) -> Endpoint`
//! or as an async closure through [`from_fn`].

mod auth;
mod headers;
mod log;
mod recover;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{Endpoint, Handler};
use crate::request::Request;
use crate::response::IntoResponse;

pub use auth::{Authenticator, ExtensionFlag, RequireAuthentication};
pub use headers::secure_headers;
pub use log::log_request;
pub use recover::recover_panic;

// ── Middleware trait ──────────────────────────────────────────────────────────

/// Transforms one endpoint into another.
///
/// Implemented for every `Fn(Endpoint) -> Endpoint`, so a plain function
/// works:
///
/// ```rust
/// use stitch::{Endpoint, Request};
///
/// fn no_cache(next: Endpoint) -> Endpoint {
///     Endpoint::new(move |req: Request| {
///         let fut = next.call(req);
///         async move {
///             let mut res = fut.await;
///             res.set_header("cache-control", "no-store");
///             res
///         }
///     })
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: Endpoint) -> Endpoint;
}

impl<F> Middleware for F
where
    F: Fn(Endpoint) -> Endpoint + Send + Sync + 'static,
{
    fn wrap(&self, next: Endpoint) -> Endpoint {
        self(next)
    }
}

/// Middleware behind a shared pointer, the element type of a [`Chain`].
pub type SharedMiddleware = Arc<dyn Middleware>;

// ── Chain ─────────────────────────────────────────────────────────────────────

/// An ordered, immutable list of middleware.
///
/// The first middleware in the list is the outermost: for `[m1, m2, m3]`
/// a request passes through `m1`, then `m2`, then `m3`, then the handler,
/// and the response travels back out in reverse.
///
/// Build it once and share it: [`apply`](Chain::apply) only reads the list,
/// and cloning a chain is one atomic increment.
#[derive(Clone)]
pub struct Chain {
    layers: Arc<[SharedMiddleware]>,
}

impl Chain {
    pub fn new() -> Self {
        Self { layers: Arc::from(Vec::new()) }
    }

    /// Appends `middleware` as the new innermost layer. Returns a new chain.
    pub fn with(self, middleware: impl Middleware) -> Self {
        let mut layers = self.layers.to_vec();
        layers.push(Arc::new(middleware));
        Self { layers: layers.into() }
    }

    /// Wraps `handler` in every middleware of the chain.
    ///
    /// Folds from the last middleware to the first, so the first one ends up
    /// wrapping everything else. With no middleware the handler's endpoint is
    /// returned as is.
    pub fn apply(&self, handler: impl Handler) -> Endpoint {
        self.layers
            .iter()
            .rev()
            .fold(Endpoint::new(handler), |next, middleware| middleware.wrap(next))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for Chain {
    fn default() -> Self { Self::new() }
}

/// Collects a copy of the given middleware, in iteration order.
impl FromIterator<SharedMiddleware> for Chain {
    fn from_iter<I: IntoIterator<Item = SharedMiddleware>>(iter: I) -> Self {
        Self { layers: iter.into_iter().collect() }
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("len", &self.layers.len()).finish()
    }
}

// ── from_fn ───────────────────────────────────────────────────────────────────

/// Builds middleware from an async function taking the request and the next
/// endpoint.
///
/// ```rust
/// use stitch::{Endpoint, Request, Response, Status};
/// use stitch::middleware::{Chain, from_fn};
///
/// let only_json = from_fn(|req: Request, next: Endpoint| async move {
///     if req.header("content-type") != Some("application/json") {
///         return Response::status(Status::UnsupportedMediaType);
///     }
///     next.call(req).await
/// });
/// let chain = Chain::new().with(only_json);
/// ```
pub fn from_fn<F, Fut, R>(f: F) -> FromFn<F>
where
    F: Fn(Request, Endpoint) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    FromFn { f: Arc::new(f) }
}

/// Middleware returned by [`from_fn`].
pub struct FromFn<F> {
    f: Arc<F>,
}

impl<F, Fut, R> Middleware for FromFn<F>
where
    F: Fn(Request, Endpoint) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn wrap(&self, next: Endpoint) -> Endpoint {
        let f = Arc::clone(&self.f);
        Endpoint::new(move |req: Request| (*f)(req, next.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::response::Response;

    type Trail = Arc<Mutex<Vec<String>>>;

    fn tracer(name: &'static str, trail: &Trail) -> impl Middleware {
        let trail = Arc::clone(trail);
        from_fn(move |req: Request, next: Endpoint| {
            let trail = Arc::clone(&trail);
            async move {
                trail.lock().unwrap().push(format!("{name}>"));
                let res = next.call(req).await;
                trail.lock().unwrap().push(format!("<{name}"));
                res
            }
        })
    }

    fn handler(trail: &Trail) -> impl Handler {
        let trail = Arc::clone(trail);
        move |_req: Request| {
            let trail = Arc::clone(&trail);
            async move {
                trail.lock().unwrap().push("handler".to_owned());
                Response::text("done")
            }
        }
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        let trail = Trail::default();
        let chain = Chain::new()
            .with(tracer("m1", &trail))
            .with(tracer("m2", &trail))
            .with(tracer("m3", &trail));

        let res = chain.apply(handler(&trail)).call(Request::builder().build()).await;

        assert_eq!(res.body(), b"done");
        assert_eq!(
            *trail.lock().unwrap(),
            ["m1>", "m2>", "m3>", "handler", "<m3", "<m2", "<m1"],
        );
    }

    // Regression: an earlier composition re-wrapped the original handler with
    // each middleware in turn, so only the last one ever ran.
    #[tokio::test]
    async fn every_middleware_runs_not_just_the_last() {
        let trail = Trail::default();
        let chain = Chain::new()
            .with(tracer("a", &trail))
            .with(tracer("b", &trail));

        chain.apply(handler(&trail)).call(Request::builder().build()).await;

        let trail = trail.lock().unwrap();
        assert_eq!(trail.first().map(String::as_str), Some("a>"));
        assert!(trail.contains(&"b>".to_owned()));
    }

    #[test]
    fn wrap_is_called_once_per_middleware_per_apply() {
        let wraps = Arc::new(Mutex::new(String::new()));
        let counting = {
            let wraps = Arc::clone(&wraps);
            move |next: Endpoint| {
                wraps.lock().unwrap().push('m');
                next
            }
        };
        let chain: Chain = std::iter::repeat_with(|| Arc::new(counting.clone()) as SharedMiddleware)
            .take(3)
            .collect();

        chain.apply(|_req: Request| async { "ok" });
        assert_eq!(*wraps.lock().unwrap(), "mmm");

        chain.apply(|_req: Request| async { "ok" });
        assert_eq!(*wraps.lock().unwrap(), "mmmmmm");
    }

    #[test]
    fn empty_chain_returns_handler_unwrapped() {
        let endpoint = Endpoint::new(|_req: Request| async { "ok" });
        let applied = Chain::new().apply(endpoint.clone());
        assert!(applied.ptr_eq(&endpoint));
    }

    #[test]
    fn collecting_copies_the_source_list() {
        let mut source: Vec<SharedMiddleware> = vec![
            Arc::new(secure_headers) as SharedMiddleware,
            Arc::new(log_request) as SharedMiddleware,
        ];
        let chain: Chain = source.iter().cloned().collect();
        source.clear();
        assert_eq!(chain.len(), 2);
    }
}
