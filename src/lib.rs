//! # stitch
//!
//! Helpers that take the repetition out of wiring a server-rendered web
//! application, on top of a deliberately small HTTP core.
//!
//! - [`middleware::Chain`]: an ordered middleware list applied to each route,
//!   plus the usual suspects ([`secure_headers`](middleware::secure_headers),
//!   [`log_request`](middleware::log_request), [`recover_panic`](middleware::recover_panic),
//!   [`RequireAuthentication`](middleware::RequireAuthentication)).
//! - [`forms::Form`]: declarative field rules with per-field error messages.
//! - [`helpers`]: `server_error` / `client_error` / `not_found` responses.
//! - [`templates`]: a page cache compiled from a template directory, and
//!   rendering with common page data filled in.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use stitch::{Request, Response, Router, Server};
//! use stitch::forms::{Form, EMAIL_RX};
//! use stitch::helpers::client_error;
//! use stitch::middleware::{Chain, log_request, recover_panic, secure_headers};
//! use stitch::Status;
//!
//! #[tokio::main]
//! async fn main() {
//!     let standard = Chain::new()
//!         .with(recover_panic)
//!         .with(log_request)
//!         .with(secure_headers);
//!
//!     let app = Router::new()
//!         .get("/",             standard.apply(home))
//!         .post("/user/signup", standard.apply(signup));
//!
//!     Server::bind("0.0.0.0:4000").serve(app).await.unwrap();
//! }
//!
//! async fn home(_req: Request) -> Response {
//!     Response::html("<h1>Latest snippets</h1>")
//! }
//!
//! async fn signup(req: Request) -> Response {
//!     let Ok(mut form) = Form::from_request(&req) else {
//!         return client_error(Status::BadRequest);
//!     };
//!     form.required("name")
//!         .required("email")
//!         .matches_pattern("email", &EMAIL_RX)
//!         .min_length("password", 10);
//!
//!     if !form.valid() {
//!         return client_error(Status::UnprocessableContent);
//!     }
//!     Response::builder()
//!         .status(Status::SeeOther)
//!         .header("location", "/user/login")
//!         .no_body()
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod forms;
pub mod helpers;
pub mod middleware;
pub mod templates;

pub use error::Error;
pub use handler::{BoxFuture, Endpoint, Handler};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
