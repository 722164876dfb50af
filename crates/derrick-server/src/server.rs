//! The HTTP server.
//!
//! A plain Hyper/Tokio setup: bind, accept, one task per connection, and a
//! graceful shutdown that drains in-flight connections for a bounded time.
//! Routing is a direct match over the two read endpoints and the health
//! probe; there are no dynamic routes to warrant a routing table.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::{Method, Request};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use uuid::Uuid;

use derrick_store::WellStore;

use crate::routes::{self, HttpResponse};
use crate::shutdown::ShutdownSignal;

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("bind error: {0}")]
    Bind(String),

    /// I/O error during server operation.
    #[error("i/o error: {0}")]
    Io(String),
}

/// The derrick read-API server.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use derrick_server::Server;
/// use derrick_store::WellStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(WellStore::open("well_data.db")?);
/// let server = Server::builder(store)
///     .http_addr("0.0.0.0:8080")
///     .build();
/// server.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    http_addr: String,
    store: Arc<WellStore>,
    request_timeout: Duration,
    shutdown_timeout: Duration,
}

impl Server {
    /// Creates a builder over the given store.
    #[must_use]
    pub fn builder(store: Arc<WellStore>) -> ServerBuilder {
        ServerBuilder {
            http_addr: "0.0.0.0:8080".to_string(),
            store,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }

    /// The configured bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Runs the server until SIGTERM/SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server until the given signal triggers, then drains
    /// in-flight connections for at most the shutdown timeout.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .http_addr
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address '{}': {e}", self.http_addr)))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        tracing::info!(%addr, "server listening");

        let server = Arc::new(self);
        let mut connections: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            connections.spawn(async move {
                                if let Err(e) = server.handle_connection(stream).await {
                                    tracing::debug!(%remote_addr, error = %e, "connection error");
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                    // Reap finished connection tasks as we go.
                    while connections.try_join_next().is_some() {}
                }

                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let in_flight = connections.len();
        if in_flight > 0 {
            tracing::info!(
                in_flight,
                timeout = ?server.shutdown_timeout,
                "draining connections"
            );
            let drain = async {
                while connections.join_next().await.is_some() {}
            };
            if tokio::time::timeout(server.shutdown_timeout, drain)
                .await
                .is_err()
            {
                tracing::warn!("shutdown timeout reached, aborting remaining connections");
                connections.shutdown().await;
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(&req).await }
        });

        http1::Builder::new().serve_connection(io, service).await
    }

    async fn handle_request(
        self: &Arc<Self>,
        req: &Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let request_id = Uuid::now_v7();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or("").to_string();
        let started = Instant::now();

        let response = match tokio::time::timeout(
            self.request_timeout,
            self.dispatch(&method, &path, &query),
        )
        .await
        {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(%request_id, %method, %path, "request timed out");
                routes::timeout_response()
            }
        };

        tracing::info!(
            %request_id,
            http.method = %method,
            http.path = %path,
            http.status_code = response.status().as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "request handled"
        );

        Ok(response)
    }

    /// Routes one request. Split out so tests can exercise the full routing
    /// table without a TCP listener.
    pub async fn dispatch(&self, method: &Method, path: &str, query: &str) -> HttpResponse {
        match (method, path) {
            (&Method::GET, "/well") => routes::get_well(&self.store, query),
            (&Method::GET, "/wells/in-polygon") => routes::wells_in_polygon(&self.store, query),
            (&Method::GET, "/health") => routes::health(),
            (_, "/well" | "/wells/in-polygon" | "/health") => routes::method_not_allowed(),
            _ => routes::not_found(path),
        }
    }
}

/// Builder for [`Server`].
pub struct ServerBuilder {
    http_addr: String,
    store: Arc<WellStore>,
    request_timeout: Duration,
    shutdown_timeout: Duration,
}

impl ServerBuilder {
    /// Sets the bind address, e.g. `"0.0.0.0:8080"`.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the per-request handling timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the graceful shutdown drain timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            http_addr: self.http_addr,
            store: self.store,
            request_timeout: self.request_timeout,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}
