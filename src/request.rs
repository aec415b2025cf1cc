//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::Extensions;
use http_body_util::BodyExt;

use crate::method::Method;

/// An incoming HTTP request, body already buffered.
///
/// Middleware can stash typed values for handlers further down the chain in
/// [`extensions_mut`](Request::extensions_mut), e.g. the authentication flag
/// read by [`is_authenticated`](crate::helpers::is_authenticated).
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: String,
    pub(crate) version: &'static str,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: Option<SocketAddr>,
    pub(crate) extensions: Extensions,
}

impl Request {
    /// Builder for requests constructed outside the server, mostly in tests.
    ///
    /// ```rust
    /// use stitch::{Method, Request};
    ///
    /// let req = Request::builder()
    ///     .method(Method::Post)
    ///     .uri("/user/login")
    ///     .header("content-type", "application/x-www-form-urlencoded")
    ///     .body("email=alice%40example.com")
    ///     .build();
    /// assert_eq!(req.path(), "/user/login");
    /// ```
    pub fn builder() -> RequestBuilder {
        RequestBuilder {
            req: Self {
                method: Method::Get,
                uri: "/".to_owned(),
                version: "HTTP/1.1",
                headers: Vec::new(),
                body: Bytes::new(),
                params: HashMap::new(),
                remote_addr: None,
                extensions: Extensions::new(),
            },
        }
    }

    /// Converts a hyper request, reading the whole body into memory.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
        method: Method,
        params: HashMap<String, String>,
        remote_addr: SocketAddr,
    ) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();

        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        let uri = parts.uri.path_and_query()
            .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned());

        Ok(Self {
            method,
            uri,
            version: version_str(parts.version),
            headers,
            body,
            params,
            remote_addr: Some(remote_addr),
            extensions: parts.extensions,
        })
    }

    pub fn method(&self) -> Method { self.method }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        self.uri.split_once('?').map_or(self.uri.as_str(), |(path, _)| path)
    }

    /// Path plus query string, as sent on the request line.
    pub fn uri(&self) -> &str { &self.uri }

    /// Protocol version, e.g. `"HTTP/1.1"`.
    pub fn version(&self) -> &str { self.version }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/snippets/{id}`, `req.param("id")` on `/snippets/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

fn version_str(version: http::Version) -> &'static str {
    match version {
        http::Version::HTTP_09 => "HTTP/0.9",
        http::Version::HTTP_10 => "HTTP/1.0",
        http::Version::HTTP_2  => "HTTP/2.0",
        http::Version::HTTP_3  => "HTTP/3.0",
        _                      => "HTTP/1.1",
    }
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Request`]. Obtain via [`Request::builder()`].
pub struct RequestBuilder {
    req: Request,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.req.method = method;
        self
    }

    pub fn uri(mut self, uri: &str) -> Self {
        self.req.uri = uri.to_owned();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.req.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.req.params.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.req.body = body.into();
        self
    }

    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.req.remote_addr = Some(addr);
        self
    }

    pub fn extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.req.extensions.insert(value);
        self
    }

    pub fn build(self) -> Request {
        self.req
    }
}
