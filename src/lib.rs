//! # pattern-router
//!
//! An ordered HTTP request router for Axum and Tokio services. Routes are registered
//! with `{name}` path templates, matched in registration order (first match wins),
//! and every matched request carries a [`Params`] map holding its path captures and
//! query parameters.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pattern_router::{Config, Params, Result, Router, Server};
//!
//! async fn search(params: Params) -> String {
//!     format!("Search for \"{}\"", params.get("s").unwrap_or_default())
//! }
//!
//! async fn show_book(params: Params) -> String {
//!     format!("Get book with ISBN = {}", params.get("isbn").unwrap_or_default())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default(); // Loads config/{RUST_ENV}.toml when present
//!     config.setup_tracing();
//!
//!     let router = Router::with_config(&config.routing)
//!         .add_route("GET", "/search", search)?
//!         .add_route("GET", "/book/{isbn}", show_book)?;
//!
//!     Server::new(config, router)?.start().await
//! }
//! ```
//!
//! `GET /search?s=stuff+to+search+for` answers `Search for "stuff to search for"` and
//! `GET /book/978-0316371247` answers `Get book with ISBN = 978-0316371247`. Anything
//! else gets a `404` with a JSON error body.
//!
//! # Templates
//!
//! A template is a `/`-separated path. A segment is either a literal or exactly one
//! `{name}` placeholder, which matches one or more characters:
//!
//! ```rust
//! use pattern_router::Pattern;
//!
//! let pattern = Pattern::compile("/path/{foo}/{bar}").unwrap();
//! assert_eq!(pattern.to_string(), "^/path/(?P<foo>.+?)/(?P<bar>.+?)$");
//! ```
//!
//! Malformed templates are rejected when the route is added.
//!
//! # Parameters
//!
//! Path captures and query parameters are merged into one map per request. When both
//! define the same name, the path value wins. Handlers read the map by taking
//! [`Params`] as an argument, or with [`get_params`] on the request. A request that did
//! not go through the router yields an empty map.
//!
//! # Configuration
//!
//! ```rust
//! use pattern_router::Config;
//! use std::time::Duration;
//!
//! let config: Config = r#"
//!     [http]
//!     bind_port = 8080
//!
//!     [routing]
//!     decode_path_params = false
//! "#.parse().unwrap();
//!
//! let config = config.with_request_timeout(Duration::from_secs(10));
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation ([`Config`]) |
//! | [`routing`] | Templates, routes and dispatch ([`Router`], [`Params`]) |
//! | [`server`] | Listener, request ids, tracing and shutdown ([`Server`]) |
//! | [`error`] | Error types and handling ([`Error`]) |
//!
pub mod config;
pub mod error;
pub mod routing;
pub mod server;
mod utils;

pub use config::*;
pub use error::*;
pub use routing::*;
pub use server::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
