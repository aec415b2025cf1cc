//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. Middleware sees the
//! same value on the way out and may add headers to it.

use bytes::Bytes;
use http_body_util::Full;
use tracing::warn;

use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content types a response body can be declared with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Csv,
    FormData,
    Html,
    Json,
    /// Binary data, e.g. a file download.
    OctetStream,
    Text,
    Xml,
}

impl ContentType {
    /// The `Content-Type` header value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv         => "text/csv",
            Self::FormData    => "application/x-www-form-urlencoded",
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// An outgoing HTTP response: status, headers in insertion order, body.
///
/// Shortcuts cover the `200 OK` cases:
///
/// ```rust
/// use stitch::{Response, Status};
///
/// Response::html("<h1>Latest snippets</h1>");
/// Response::text("hello");
/// Response::status(Status::NoContent);
/// ```
///
/// Anything else goes through the builder:
///
/// ```rust
/// use stitch::{ContentType, Response, Status};
///
/// Response::builder()
///     .status(Status::SeeOther)
///     .header("location", "/snippet/view/42")
///     .no_body();
///
/// Response::builder()
///     .header("content-disposition", "attachment; filename=snippets.csv")
///     .bytes(ContentType::Csv, b"id,title\n1,An old silent pond\n".to_vec());
/// ```
pub struct Response {
    status: Status,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// `200 OK` with an `application/json` body.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` with an HTML body. What [`render`](crate::templates::render) sends.
    pub fn html(body: impl Into<String>) -> Self {
        Self::builder().html(body)
    }

    /// `200 OK` with a plain-text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// `status` with no headers and no body.
    pub fn status(status: Status) -> Self {
        Self::builder().status(status).no_body()
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: Status::Ok, headers: Vec::new() }
    }

    pub fn status_code(&self) -> u16 { self.status.code() }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    /// Converts into the hyper response the server writes to the wire.
    ///
    /// Headers whose name or value is not valid HTTP are dropped with a warning.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = http::StatusCode::from_u16(self.status.code())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (
                http::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => { headers.append(name, value); }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`], obtained from [`Response::builder()`].
///
/// Status defaults to `200 OK`. Every builder ends in exactly one body
/// method, which also sets `content-type`.
pub struct ResponseBuilder {
    status: Status,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn json(self, body: Vec<u8>) -> Response {
        self.bytes(ContentType::Json, body)
    }

    pub fn html(self, body: impl Into<String>) -> Response {
        self.bytes(ContentType::Html, body.into().into_bytes())
    }

    pub fn text(self, body: impl Into<String>) -> Response {
        self.bytes(ContentType::Text, body.into().into_bytes())
    }

    /// Body of any [`ContentType`]: XML, CSV, file downloads.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        headers.push(("content-type".to_owned(), content_type.as_str().to_owned()));
        headers.extend(self.headers);
        Response { status: self.status, headers, body }
    }

    /// No body and no `content-type`, for redirects and `204 No Content`.
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Vec::new() }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Anything a handler may return.
///
/// Implement it on your own types to return them directly:
///
/// ```rust
/// use stitch::{IntoResponse, Response};
///
/// struct Greeting(String);
///
/// impl IntoResponse for Greeting {
///     fn into_response(self) -> Response {
///         Response::html(format!("<p>Hello, {}</p>", self.0))
///     }
/// }
/// ```
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// A bare status, no body.
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}
