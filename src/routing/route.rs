use {
    super::{
        handler::{BoxFuture, ErasedHandler},
        pattern::Pattern,
    },
    axum::body::Body,
    http::{Method, Request},
    std::{fmt, sync::Arc},
};

/// A registered route: a verb, a compiled path pattern and a handler.
///
/// Routes are created by [`Router::add_route`](crate::Router::add_route) and never
/// change afterwards.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: Pattern,
    handler: Arc<dyn ErasedHandler>,
}

impl Route {
    pub(crate) fn new(method: Method, pattern: Pattern, handler: Arc<dyn ErasedHandler>) -> Self {
        Self {
            method,
            pattern,
            handler,
        }
    }

    /// The verb this route answers to.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The compiled path pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The template the route was registered with, e.g. `/book/{isbn}`.
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    /// Returns the raw path captures if both verb and path match.
    pub(crate) fn matches<'a>(
        &'a self,
        method: &Method,
        path: &'a str,
    ) -> Option<Vec<(&'a str, &'a str)>> {
        if self.method != *method {
            return None;
        }
        self.pattern.captures(path)
    }

    pub(crate) fn call(&self, request: Request<Body>) -> BoxFuture {
        self.handler.call(request)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
