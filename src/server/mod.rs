//! Hosting a [`Router`] on a TCP listener.
//!
//! The router only knows how to turn one request into one response. [`Server`] adds
//! what a running service needs around it: a listener, request ids, a tracing span per
//! request, an optional per-request timeout and graceful shutdown.
//!
//! Layers, from the outside in:
//!
//! ```text
//! SetRequestId → PropagateRequestId → Trace → Timeout (optional) → RouterService
//! ```

mod shutdown;

use {
    crate::{Config, Result, Router, RouterService, utils::RequestIdGenerator},
    axum::body::Body,
    http::{HeaderName, Request, StatusCode},
    tokio::net::TcpListener,
    tokio_util::sync::CancellationToken,
    tower_http::{
        request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
        timeout::TimeoutLayer,
        trace::TraceLayer,
    },
};

use shutdown::shutdown_signal;

/// Serves a frozen [`Router`] according to a [`Config`].
///
/// ```rust,no_run
/// use pattern_router::{Config, Params, Router, Server};
///
/// #[tokio::main]
/// async fn main() -> pattern_router::Result<()> {
///     let config = Config::default();
///     config.setup_tracing();
///
///     let router = Router::with_config(&config.routing)
///         .get("/book/{isbn}", |params: Params| async move {
///             format!("Get book with ISBN = {}", params.get("isbn").unwrap_or_default())
///         })?;
///
///     Server::new(config, router)?.start().await
/// }
/// ```
#[derive(Debug)]
pub struct Server {
    config: Config,
    service: RouterService,
    shutdown: CancellationToken,
}

impl Server {
    /// Validates `config` and freezes `router`. No route can be added afterwards.
    pub fn new(config: Config, router: Router) -> Result<Self> {
        config.validate()?;

        if router.config() != &config.routing {
            tracing::warn!(
                "Router was built with routing options that differ from the [routing] configuration; the router's own options apply"
            );
        }
        if router.is_empty() {
            tracing::warn!("Serving a router without routes; every request will get 404");
        }

        Ok(Self {
            config,
            service: router.into_service(),
            shutdown: CancellationToken::new(),
        })
    }

    /// The configuration the server was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a token that stops the server when cancelled. The server also cancels
    /// it when a shutdown signal arrives.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Builds the axum application: the router service as fallback plus the server
    /// layers. Useful for in-process tests with `oneshot()`.
    pub fn app(&self) -> axum::Router {
        let x_request_id = HeaderName::from_static("x-request-id");
        let mut app = axum::Router::new().fallback_service(self.service.clone());

        if let Some(timeout) = self.config.http.request_timeout {
            app = app.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));
        }

        app.layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, RequestIdGenerator))
    }

    /// Binds `[http] bind_addr:bind_port` and serves until shutdown.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.http.full_bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until shutdown.
    ///
    /// Once shutdown starts, in-flight requests get `[http] shutdown_timeout` to
    /// complete before the server returns anyway.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Bound to {}", local_addr);
        tracing::info!("Waiting for connections");

        let app = self.app();
        let shutdown_timeout = self.config.http.shutdown_timeout;
        let token = self.shutdown.clone();

        let serve_future = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal(token.clone(), shutdown_timeout));

        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                // The grace period only starts once shutdown has been requested.
                token.cancelled().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Params};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config::from_toml("[http]\nbind_port = 0\n").unwrap()
    }

    fn book_router() -> Router {
        Router::new()
            .get("/book/{isbn}", |params: Params| async move {
                format!("Get book with ISBN = {}", params.get("isbn").unwrap_or("?"))
            })
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = test_config().with_bind_addr("nowhere");
        let err = Server::new(config, Router::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_app_routes_through_router() {
        let server = Server::new(test_config(), book_router()).unwrap();
        let response = server.app().oneshot(get("/book/123")).await.unwrap();

        assert_eq!(response.status(), 200);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Get book with ISBN = 123");
    }

    #[tokio::test]
    async fn test_app_sets_request_id() {
        let server = Server::new(test_config(), book_router()).unwrap();
        let response = server.app().oneshot(get("/book/1")).await.unwrap();

        let id = response
            .headers()
            .get("x-request-id")
            .expect("x-request-id header should be set");
        assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_app_keeps_incoming_request_id() {
        let server = Server::new(test_config(), book_router()).unwrap();
        let request = Request::builder()
            .uri("/nope")
            .header("x-request-id", "from-proxy")
            .body(Body::empty())
            .unwrap();
        let response = server.app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(response.headers()["x-request-id"], "from-proxy");
    }

    #[tokio::test]
    async fn test_request_timeout_answers_408() {
        let router = Router::new()
            .get("/slow", || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            })
            .unwrap();
        let config = test_config().with_request_timeout(Duration::from_millis(20));
        let server = Server::new(config, router).unwrap();

        let response = server.app().oneshot(get("/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_serve_stops_on_cancellation() {
        let server = Server::new(test_config(), book_router()).unwrap();
        let token = server.cancellation_token();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let handle = tokio::spawn(server.serve(listener));
        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server should stop after cancellation")
            .unwrap();
        assert!(result.is_ok());
    }
}
