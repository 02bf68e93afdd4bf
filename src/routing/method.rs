//! Route verb validation.
//!
//! Verbs are method tokens compared case-sensitively. Registration accepts the standard
//! methods and any valid extension token (`PURGE`, `PROPFIND`), but rejects lowercase or
//! mixed-case spellings of a standard method, since `get` would otherwise register a
//! route no browser or client will ever reach.

use {
    crate::{Error, Result},
    http::Method,
};

const STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
    Method::CONNECT,
    Method::TRACE,
];

/// Parses a route verb into a [`Method`].
///
/// ```rust
/// use pattern_router::parse_verb;
///
/// assert_eq!(parse_verb("GET").unwrap(), http::Method::GET);
/// assert_eq!(parse_verb("PURGE").unwrap().as_str(), "PURGE");
/// assert!(parse_verb("get").is_err());
/// ```
pub fn parse_verb(verb: &str) -> Result<Method> {
    let method = Method::from_bytes(verb.as_bytes()).map_err(|_| {
        Error::invalid_method(format!("\"{verb}\" is not a valid HTTP method token"))
    })?;

    if !STANDARD_METHODS.contains(&method) {
        let upper = verb.to_ascii_uppercase();
        if let Some(standard) = STANDARD_METHODS.iter().find(|m| m.as_str() == upper) {
            return Err(Error::invalid_method(format!(
                "method \"{verb}\" looks like a misspelling of \"{standard}\"; methods are case-sensitive"
            )));
        }
    }

    Ok(method)
}
