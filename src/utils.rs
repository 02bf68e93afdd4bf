//!
//! Small helpers shared by the configuration loader and the server.
//!
//! - [`RequestIdGenerator`] keeps an incoming `x-request-id` or mints a UUIDv7 one
//! - [`replace_handlebars_with_env`] expands `{{ VAR }}` references in configuration text
//!

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::{ContextV7, Timestamp, Uuid},
};

/// Matches `{{ VAR_NAME }}` with optional inner whitespace. Names follow the usual
/// environment variable convention: uppercase letters, digits and underscores.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Request id source for the server's `x-request-id` layers.
///
/// A request that already carries an `x-request-id` header keeps it, so ids assigned
/// by a proxy in front of the router survive. Otherwise a time-ordered UUIDv7 is
/// generated, which makes ids sortable in the logs.
///
/// ```
/// use pattern_router::RequestIdGenerator;
/// use tower_http::request_id::SetRequestIdLayer;
///
/// let layer = SetRequestIdLayer::x_request_id(RequestIdGenerator);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        if let Some(value) = req.headers().get("x-request-id") {
            return Some(RequestId::new(value.clone()));
        }

        let cx = ContextV7::new().with_additional_precision();
        let uuid = Uuid::new_v7(Timestamp::now(cx));
        let value = HeaderValue::from_str(&uuid.to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Replaces every `{{ VAR }}` in `input` with the value of the environment variable
/// `VAR`. Unset variables are replaced with an empty string and a warning is logged.
///
/// ```
/// use pattern_router::replace_handlebars_with_env;
///
/// let text = replace_handlebars_with_env("port = {{ SURELY_NOT_SET_ANYWHERE }}");
/// assert_eq!(text, "port = ");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .into_owned()
}
