//! Bookstore Example
//!
//! Query parameters and path captures land in the same [`Params`] map.
//!
//! Run with:
//! ```bash
//! RUST_ENV=dev cargo run --example bookstore
//! ```
//!
//! Then test:
//! ```bash
//! curl 'http://localhost:3000/search?s=stuff+to+search+for'
//! curl http://localhost:3000/book/978-0316371247
//! curl 'http://localhost:3000/book/978-0316371247?format=paperback'
//! curl -X DELETE http://localhost:3000/book/978-0316371247
//! ```

use axum::{body::Body, http::Request};
use pattern_router::{Config, Params, Result, Router, Server, get_params};

async fn search(params: Params) -> String {
    format!("Search for \"{}\"\n", params.get("s").unwrap_or_default())
}

async fn show_book(params: Params) -> String {
    let isbn = params.get("isbn").unwrap_or_default();
    match params.get("format") {
        Some(format) => format!("Get book with ISBN = {isbn} ({format})\n"),
        None => format!("Get book with ISBN = {isbn}\n"),
    }
}

// Handlers that need the whole request can still read the parameters from it.
async fn delete_book(request: Request<Body>) -> String {
    let params = get_params(&request);
    format!(
        "Deleted book with ISBN = {}\n",
        params.get("isbn").unwrap_or_default()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::default();
    config.setup_tracing();

    let router = Router::with_config(&config.routing)
        .add_route("GET", "/search", search)?
        .add_route("GET", "/book/{isbn}", show_book)?
        .add_route("DELETE", "/book/{isbn}", delete_book)?;

    for route in router.routes() {
        tracing::info!(method = %route.method(), pattern = %route.pattern(), "{}", route.template());
    }

    Server::new(config, router)?.start().await
}
