//! Shutdown triggers for the server.
//!
//! The server stops accepting connections when the process receives Ctrl+C or
//! SIGTERM, or when its [`CancellationToken`] is cancelled. Whatever the trigger, the
//! token ends up cancelled so background tasks holding a clone of it stop as well.
//!
//! ```rust,no_run
//! use pattern_router::{Config, Router, Server};
//!
//! # async fn example() -> pattern_router::Result<()> {
//! let server = Server::new(Config::default(), Router::new())?;
//! let token = server.cancellation_token();
//!
//! tokio::spawn(async move {
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     token.cancel();
//! });
//!
//! server.start().await
//! # }
//! ```

use {std::time::Duration, tokio::signal, tokio_util::sync::CancellationToken};

/// Resolves once a shutdown has been requested, then cancels `token`.
///
/// If a signal handler cannot be installed a warning is logged and that trigger is
/// ignored; the other triggers still work.
pub(crate) async fn shutdown_signal(token: CancellationToken, timeout: Duration) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::debug!("Ctrl+C signal received"),
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = token.cancelled() => tracing::debug!("Shutdown requested through cancellation token"),
    }

    tracing::info!(
        "Shutdown signal received, starting graceful shutdown (timeout: {}s)",
        timeout.as_secs()
    );
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_token_resolves_signal() {
        let token = CancellationToken::new();
        token.cancel();

        tokio::time::timeout(
            Duration::from_secs(1),
            shutdown_signal(token.clone(), Duration::from_secs(1)),
        )
        .await
        .expect("shutdown_signal should resolve once the token is cancelled");
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_signal_waits_while_token_is_live() {
        let token = CancellationToken::new();
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            shutdown_signal(token.clone(), Duration::from_secs(1)),
        )
        .await;
        assert!(result.is_err());
        assert!(!token.is_cancelled());
    }
}
