//! Panic recovery.

use std::any::Any;

use tokio::task::AbortHandle;

use crate::handler::Endpoint;
use crate::helpers::server_error;
use crate::request::Request;

#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {0}")]
struct Panicked(String);

/// Runs the rest of the chain on its own task and turns a panic into a
/// `500 Internal Server Error` with `Connection: close`.
///
/// The panic message is logged through [`server_error`]; the client only
/// sees the status text. If the response future is dropped (the client went
/// away), the task is aborted with it.
pub fn recover_panic(next: Endpoint) -> Endpoint {
    Endpoint::new(move |req: Request| {
        let fut = next.call(req);
        async move {
            let task = tokio::spawn(fut);
            let _abort = AbortOnDrop(task.abort_handle());
            match task.await {
                Ok(res) => res,
                Err(e) if e.is_panic() => {
                    let mut res = server_error(&Panicked(panic_message(e.into_panic())));
                    res.set_header("Connection", "close");
                    res
                }
                Err(e) => server_error(&e),
            }
        }
    })
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(msg) => *msg,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map_or_else(|| "unknown panic".to_owned(), |msg| (*msg).to_owned()),
    }
}
