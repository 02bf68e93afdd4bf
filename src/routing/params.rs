//! Per-request parameter store.
//!
//! When a route matches, the router assembles a [`Params`] from the path captures and
//! the query string and inserts it into the request's extensions. The request itself is
//! the request-scoped context: handlers read the parameters back with [`get_params`] or
//! by taking [`Params`] as an extractor argument. Nothing is shared between requests.

use {
    axum::extract::FromRequestParts,
    http::{Extensions, Request, request::Parts},
    percent_encoding::percent_decode_str,
    std::{
        collections::{HashMap, hash_map},
        convert::Infallible,
    },
};

/// Path and query parameters of a single matched request.
///
/// Keys are unique. When a query parameter has the same name as a path placeholder,
/// the path value is kept. When a query parameter is repeated, the first occurrence
/// is kept.
///
/// ```rust
/// use pattern_router::Params;
///
/// async fn show_book(params: Params) -> String {
///     format!("Get book with ISBN = {}", params.get("isbn").unwrap_or("?"))
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Creates an empty parameter store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store for one matched request.
    ///
    /// Query pairs are form-urlencoded decoded. Path values are percent-decoded when
    /// `decode_path` is set and inserted last, overriding query values of the same name.
    pub(crate) fn assemble(
        path: Vec<(&str, &str)>,
        query: Option<&str>,
        decode_path: bool,
    ) -> Self {
        let mut map = HashMap::with_capacity(path.len());

        if let Some(query) = query {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                if name.is_empty() {
                    continue;
                }
                map.entry(name.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }

        for (name, value) in path {
            let value = if decode_path {
                percent_decode_str(value).decode_utf8_lossy().into_owned()
            } else {
                value.to_string()
            };
            map.insert(name.to_string(), value);
        }

        Self(map)
    }

    /// Returns the parameters attached to a request's extensions, or an empty store
    /// if the request never went through the router.
    pub fn from_extensions(extensions: &Extensions) -> Self {
        extensions.get::<Params>().cloned().unwrap_or_default()
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if the parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consumes the store and returns the underlying map.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<Params> for HashMap<String, String> {
    fn from(params: Params) -> Self {
        params.0
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Returns the parameters the router attached to `request`.
///
/// Never fails: a request that did not pass through the router yields an empty store.
///
/// ```rust
/// use axum::body::Body;
/// use http::Request;
/// use pattern_router::get_params;
///
/// let request = Request::builder().uri("/").body(Body::empty()).unwrap();
/// assert!(get_params(&request).is_empty());
/// ```
pub fn get_params<B>(request: &Request<B>) -> Params {
    Params::from_extensions(request.extensions())
}

impl<S> FromRequestParts<S> for Params
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Params::from_extensions(&parts.extensions))
    }
}
