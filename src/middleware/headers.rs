//! Browser hardening headers.

use crate::handler::Endpoint;
use crate::request::Request;

const HEADERS: [(&str, &str); 2] = [
    ("X-XSS-Protection", "1;mode=block"),
    ("X-Frame-Options", "deny"),
];

/// Adds `X-XSS-Protection: 1;mode=block` and `X-Frame-Options: deny` to
/// every response.
///
/// A handler that sets either header itself keeps its own value.
pub fn secure_headers(next: Endpoint) -> Endpoint {
    Endpoint::new(move |req: Request| {
        let fut = next.call(req);
        async move {
            let mut res = fut.await;
            for (name, value) in HEADERS {
                if res.header(name).is_none() {
                    res.set_header(name, value);
                }
            }
            res
        }
    })
}
