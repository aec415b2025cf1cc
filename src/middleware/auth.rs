//! Authentication gate.

use std::sync::Arc;

use super::Middleware;
use crate::handler::{BoxFuture, Endpoint};
use crate::helpers::is_authenticated;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Decides whether a request comes from a signed-in user, and where to send
/// it if not. Implemented by the application, usually on top of its session
/// store.
pub trait Authenticator: Send + Sync + 'static {
    fn is_authenticated(&self, req: &Request) -> bool;
    fn redirect_to(&self) -> &str;
}

/// Redirects unauthenticated requests with `302 Found`; lets the rest through.
///
/// ```rust
/// use stitch::middleware::{Chain, ExtensionFlag, RequireAuthentication};
///
/// let protected = Chain::new()
///     .with(RequireAuthentication::new(ExtensionFlag::new("/user/login")));
/// ```
pub struct RequireAuthentication<A> {
    auth: Arc<A>,
}

impl<A: Authenticator> RequireAuthentication<A> {
    pub fn new(auth: A) -> Self {
        Self { auth: Arc::new(auth) }
    }

    /// Shares an authenticator the application already holds.
    pub fn shared(auth: Arc<A>) -> Self {
        Self { auth }
    }
}

impl<A: Authenticator> Middleware for RequireAuthentication<A> {
    fn wrap(&self, next: Endpoint) -> Endpoint {
        let auth = Arc::clone(&self.auth);
        Endpoint::new(move |req: Request| -> BoxFuture {
            if auth.is_authenticated(&req) {
                return next.call(req);
            }
            let res = Response::builder()
                .status(Status::Found)
                .header("Location", auth.redirect_to())
                .no_body();
            Box::pin(std::future::ready(res))
        })
    }
}

/// [`Authenticator`] that trusts the [`IsAuthenticated`](crate::helpers::IsAuthenticated)
/// request extension, set by an earlier middleware.
#[derive(Clone, Debug)]
pub struct ExtensionFlag {
    redirect_to: String,
}

impl ExtensionFlag {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self { redirect_to: redirect_to.into() }
    }
}

impl Authenticator for ExtensionFlag {
    fn is_authenticated(&self, req: &Request) -> bool {
        is_authenticated(req)
    }

    fn redirect_to(&self) -> &str {
        &self.redirect_to
    }
}
