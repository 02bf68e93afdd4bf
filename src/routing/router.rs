use {
    super::{
        handler::HandlerFn,
        method::parse_verb,
        params::Params,
        pattern::{LiteralMode, Pattern},
        route::Route,
    },
    crate::{Error, Result, RoutingConfig},
    axum::{body::Body, handler::Handler, response::IntoResponse, response::Response},
    http::Request,
    std::{
        convert::Infallible,
        fmt,
        future::{Future, ready},
        pin::Pin,
        sync::Arc,
        task::{Context, Poll},
    },
    tower::Service,
};

/// An ordered, append-only list of routes.
///
/// Requests are matched against the routes in registration order and the first route
/// whose verb and path both match handles the request. Routes are never merged,
/// deduplicated or reordered, so registering a more specific route after a broader one
/// leaves it unreachable.
///
/// ```rust
/// use pattern_router::{Params, Router};
///
/// # fn main() -> pattern_router::Result<()> {
/// let router = Router::new()
///     .add_route("GET", "/book/{isbn}", |params: Params| async move {
///         format!("Get book with ISBN = {}", params.get("isbn").unwrap_or_default())
///     })?
///     .add_route("GET", "/", || async { "home" })?;
///
/// assert_eq!(router.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    config: RoutingConfig,
}

impl Router {
    /// Creates an empty router with the default routing behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty router using `config` for literal escaping and path decoding.
    pub fn with_config(config: &RoutingConfig) -> Self {
        Self {
            routes: Vec::new(),
            config: config.clone(),
        }
    }

    /// Compiles `pattern`, validates `verb` and appends a route for `handler`.
    ///
    /// Fails with [`ErrorKind::InvalidPattern`](crate::ErrorKind::InvalidPattern) for a
    /// malformed template and [`ErrorKind::InvalidMethod`](crate::ErrorKind::InvalidMethod)
    /// for a verb that is not a method token.
    pub fn add_route<V, H, T>(mut self, verb: V, pattern: &str, handler: H) -> Result<Self>
    where
        V: AsRef<str>,
        H: Handler<T, ()>,
        T: 'static,
    {
        let method = parse_verb(verb.as_ref())?;
        let pattern = Pattern::compile_with(pattern, self.literal_mode())?;

        tracing::debug!(
            method = %method,
            template = pattern.template(),
            pattern = %pattern,
            position = self.routes.len(),
            "Route registered"
        );

        let handler = Arc::new(HandlerFn::new(handler));
        self.routes.push(Route::new(method, pattern, handler));
        Ok(self)
    }

    /// Registers a `GET` route.
    pub fn get<H, T>(self, pattern: &str, handler: H) -> Result<Self>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add_route("GET", pattern, handler)
    }

    /// Registers a `POST` route.
    pub fn post<H, T>(self, pattern: &str, handler: H) -> Result<Self>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add_route("POST", pattern, handler)
    }

    /// Registers a `PUT` route.
    pub fn put<H, T>(self, pattern: &str, handler: H) -> Result<Self>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add_route("PUT", pattern, handler)
    }

    /// Registers a `DELETE` route.
    pub fn delete<H, T>(self, pattern: &str, handler: H) -> Result<Self>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add_route("DELETE", pattern, handler)
    }

    /// Registers a `PATCH` route.
    pub fn patch<H, T>(self, pattern: &str, handler: H) -> Result<Self>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add_route("PATCH", pattern, handler)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no route has been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the routes in match order.
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &Route> {
        self.routes.iter()
    }

    /// The routing options this router was created with.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Routes a single request.
    ///
    /// Matching happens before this returns. On a match the assembled [`Params`] are
    /// inserted into the request extensions and the returned future runs the handler
    /// exactly once. Without a match the future resolves to a `404 Not Found` and no
    /// handler runs.
    pub fn dispatch(
        &self,
        mut request: Request<Body>,
    ) -> impl Future<Output = Response> + Send + use<> {
        let method = request.method().clone();

        let matched = {
            let uri = request.uri();
            let path = uri.path();
            self.routes.iter().find_map(|route| {
                let captures = route.matches(&method, path)?;
                let params =
                    Params::assemble(captures, uri.query(), self.config.decode_path_params);
                Some((route, params))
            })
        };

        let future: Pin<Box<dyn Future<Output = Response> + Send>> = match matched {
            Some((route, params)) => {
                tracing::debug!(
                    method = %method,
                    route = route.template(),
                    params = params.len(),
                    "Route matched"
                );
                request.extensions_mut().insert(params);
                route.call(request)
            }
            None => {
                let path = request.uri().path();
                tracing::debug!(method = %method, path, "No route matched");
                Box::pin(ready(
                    Error::route_not_found(&method, path).into_response(),
                ))
            }
        };
        future
    }

    /// Freezes the router into a cloneable [`tower::Service`].
    ///
    /// No route can be added once the router has been turned into a service.
    pub fn into_service(self) -> RouterService {
        RouterService {
            router: Arc::new(self),
        }
    }

    fn literal_mode(&self) -> LiteralMode {
        if self.config.escape_literals {
            LiteralMode::Escaped
        } else {
            LiteralMode::Verbatim
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("config", &self.config)
            .finish()
    }
}

/// A frozen [`Router`] usable wherever a [`tower::Service`] is expected, for example
/// as an axum fallback service.
///
/// Cloning is cheap; every clone shares the same route list.
#[derive(Clone, Debug)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    /// The router behind this service.
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn Future<Output = std::result::Result<Response, Infallible>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let response = self.router.dispatch(request);
        Box::pin(async move { Ok(response.await) })
    }
}
