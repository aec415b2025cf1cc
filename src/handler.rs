//! Handlers, and the [`Endpoint`] every handler becomes.
//!
//! Routes and middleware deal in one concrete type, [`Endpoint`]: an
//! `Arc` around a type-erased handler. Any `async fn(Request) -> impl IntoResponse`
//! converts into one, and calling it boxes the handler's future:
//!
//! ```text
//! async fn home(req) ──Endpoint::new──▶ Arc<FnHandler<home>> ──call(req)──▶ BoxFuture
//! ```
//!
//! Middleware receives the next endpoint, and returns a new endpoint that
//! calls it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future an [`Endpoint`] returns.
///
/// `Send + 'static`, so it can be moved onto its own task
/// (see [`recover_panic`](crate::middleware::recover_panic)).
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe face of a handler. Public only because [`Handler`] names it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// Shared, type-erased handler.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is satisfied by any `async fn`
/// with the signature
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// and by [`Endpoint`], which is what [`Chain::apply`](crate::middleware::Chain::apply)
/// returns. The trait is **sealed**: only the impls in this module satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// A concrete handler behind [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Endpoint ──────────────────────────────────────────────────────────────────

/// A type-erased handler that is cheap to clone (one atomic increment).
///
/// Endpoints are what middleware consumes and produces. Register one on a
/// [`Router`](crate::Router) like any other handler.
#[derive(Clone)]
pub struct Endpoint(BoxedHandler);

impl Endpoint {
    pub fn new(handler: impl Handler) -> Self {
        Self(handler.into_boxed_handler())
    }

    /// Runs the wrapped handler (and whatever middleware it already carries).
    pub fn call(&self, req: Request) -> BoxFuture {
        self.0.call(req)
    }

    /// True when both endpoints share the same underlying handler allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

impl private::Sealed for Endpoint {}

impl Handler for Endpoint {
    fn into_boxed_handler(self) -> BoxedHandler {
        self.0
    }
}
