//! Hello World Example
//!
//! The smallest useful router: one fixed route and one route with a placeholder.
//!
//! Run with:
//! ```bash
//! RUST_ENV=dev cargo run --example hello_world
//! ```
//!
//! Then test:
//! ```bash
//! curl http://localhost:3000/
//! curl http://localhost:3000/hello/world
//! curl -i http://localhost:3000/nothing   # 404
//! ```

use axum::Json;
use pattern_router::{Config, Params, Result, Router, Server};
use serde::Serialize;

#[derive(Serialize)]
struct Message {
    message: String,
}

async fn hello() -> Json<Message> {
    Json(Message {
        message: "Hello, World!".into(),
    })
}

async fn greet(params: Params) -> Json<Message> {
    Json(Message {
        message: format!("Hello, {}!", params.get("name").unwrap_or("stranger")),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::default();
    config.setup_tracing();

    let router = Router::with_config(&config.routing)
        .get("/", hello)?
        .get("/hello/{name}", greet)?;

    Server::new(config, router)?.start().await
}
