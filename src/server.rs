//! HTTP server and graceful shutdown.
//!
//! Each accepted connection gets its own task. When the shutdown future
//! resolves the accept loop ends, and [`Server::serve`] returns once every
//! open connection has finished.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::helpers::{client_error, not_found};
use crate::method::Method;
use crate::request::Request;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server.
///
/// ```rust,no_run
/// # async fn run(app: stitch::Router) -> Result<(), stitch::Error> {
/// stitch::Server::bind("0.0.0.0:4000").serve(app).await
/// # }
/// ```
pub struct Server {
    addr: String,
}

impl Server {
    /// Remembers `addr` (`host:port`); the socket is opened by [`serve`](Server::serve),
    /// which reports a bad address or a port in use as [`Error::Io`].
    pub fn bind(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Serves `router` until SIGTERM or Ctrl-C.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `signal` resolves, then waits for open
    /// connections to finish.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = TcpListener::bind(&self.addr).await?;
        let router = Arc::new(router);
        let mut connections = JoinSet::new();

        info!(addr = %listener.local_addr()?, "listening");
        tokio::pin!(signal);

        loop {
            tokio::select! {
                biased;

                () = &mut signal => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(serve_connection(stream, peer, Arc::clone(&router)));
                    }
                    Err(e) => error!("accept error: {e}"),
                },

                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        info!(open = connections.len(), "shutting down, waiting for open connections");
        while connections.join_next().await.is_some() {}
        info!("server stopped");
        Ok(())
    }
}

/// Drives one connection, HTTP/1.1 or HTTP/2, until the peer closes it.
async fn serve_connection(stream: TcpStream, peer: SocketAddr, router: Arc<Router>) {
    debug!(%peer, "connection opened");

    let service = service_fn(move |req| dispatch(Arc::clone(&router), req, peer));
    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        error!(%peer, "connection error: {e}");
    }
}

/// Routes one request to its endpoint.
///
/// Never fails: an unsupported method is `405`, an unknown path `404`, and an
/// unreadable body `400`.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let Ok(method) = req.method().as_str().parse::<Method>() else {
        return Ok(client_error(Status::MethodNotAllowed).into_inner());
    };
    let Some((endpoint, params)) = router.lookup(method, req.uri().path()) else {
        return Ok(not_found().into_inner());
    };

    let res = match Request::from_hyper(req, method, params, peer).await {
        Ok(req) => endpoint.call(req).await,
        Err(e) => {
            warn!(%peer, "failed to read request body: {e}");
            client_error(Status::BadRequest)
        }
    };
    Ok(res.into_inner())
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    tokio::select! {
        () = ctrl_c() => {}
        () = terminate() => {}
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("cannot listen for SIGTERM: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
