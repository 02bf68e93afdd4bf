//! Router unit tests.
//!
//! These run in-process: requests are handed straight to [`Router::dispatch`] or to the
//! frozen service with `oneshot()`, without a listener.
//!
//! [`Router::dispatch`]: crate::Router::dispatch

use crate::Params;
use axum::{body::Body, http::Request, response::Response};


/// Builds an empty-bodied request.
pub(crate) fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build test request")
}

/// Builds an empty-bodied GET request.
pub(crate) fn get_request(uri: &str) -> Request<Body> {
    request("GET", uri)
}

/// Reads the whole response body as a string.
pub(crate) async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Handler that renders every parameter as `name=value`, sorted and joined by `&`.
pub(crate) async fn echo_params(params: Params) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    pairs.join("&")
}
