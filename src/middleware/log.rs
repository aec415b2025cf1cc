//! Access logging.

use tracing::info;

use crate::handler::Endpoint;
use crate::request::Request;

/// Logs one `info` line per request before handing it on:
/// `<remote addr> - <protocol> <method> <uri>`.
pub fn log_request(next: Endpoint) -> Endpoint {
    Endpoint::new(move |req: Request| {
        let remote = req.remote_addr().map_or_else(|| "-".to_owned(), |addr| addr.to_string());
        info!(
            remote = %remote,
            method = %req.method(),
            uri = req.uri(),
            "{remote} - {} {} {}",
            req.version(),
            req.method(),
            req.uri(),
        );
        next.call(req)
    })
}
