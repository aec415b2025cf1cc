//! Response helpers for the two kinds of failure a handler reports.
//!
//! - **Server errors** are logged in full (message and backtrace) and the
//!   client gets a bare `500 Internal Server Error`. Nothing internal leaks.
//! - **Client errors** carry only the status code and its reason phrase.
//!
//! ```rust
//! use stitch::{Request, Response, Status};
//! use stitch::helpers::{client_error, not_found};
//!
//! async fn show_snippet(req: Request) -> Response {
//!     let Some(id) = req.param("id").and_then(|id| id.parse::<u32>().ok()) else {
//!         return not_found();
//!     };
//!     if id == 0 {
//!         return client_error(Status::BadRequest);
//!     }
//!     Response::html(format!("<h1>Snippet #{id}</h1>"))
//! }
//! ```

use std::backtrace::Backtrace;

use tracing::error;

use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Logs `err` with a backtrace at `error` level and returns a generic 500.
pub fn server_error<E>(err: &E) -> Response
where
    E: std::error::Error + ?Sized,
{
    let trace = Backtrace::force_capture();
    error!(error = %err, "{err}\n{trace}");
    client_error(Status::InternalServerError)
}

/// A response with `status` and its reason phrase as a plain-text body.
pub fn client_error(status: Status) -> Response {
    Response::builder()
        .status(status)
        .header("x-content-type-options", "nosniff")
        .text(status.text())
}

/// `404 Not Found`.
pub fn not_found() -> Response {
    client_error(Status::NotFound)
}

/// Request extension recording whether the request belongs to a signed-in
/// user. Set it from the middleware that loads the session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IsAuthenticated(pub bool);

/// Reads the [`IsAuthenticated`] extension; `false` when it was never set.
pub fn is_authenticated(req: &Request) -> bool {
    req.extensions()
        .get::<IsAuthenticated>()
        .is_some_and(|flag| flag.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_hides_detail() {
        let err = std::io::Error::other("disk on fire");

        let res = server_error(&err);

        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), b"Internal Server Error");
    }

    #[test]
    fn client_error_uses_status_text() {
        let res = client_error(Status::BadRequest);

        assert_eq!(res.status_code(), 400);
        assert_eq!(res.body(), b"Bad Request");
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn not_found_is_404() {
        let res = not_found();

        assert_eq!(res.status_code(), 404);
        assert_eq!(res.body(), b"Not Found");
    }

    #[test]
    fn authentication_flag_defaults_to_false() {
        assert!(!is_authenticated(&Request::builder().build()));
        assert!(!is_authenticated(&Request::builder().extension(IsAuthenticated(false)).build()));
        assert!(is_authenticated(&Request::builder().extension(IsAuthenticated(true)).build()));
    }
}
