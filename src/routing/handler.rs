//! Type erasure for route handlers.
//!
//! Anything implementing axum's [`Handler`] can be registered: async functions,
//! closures, or functions taking extractors such as [`Params`](crate::Params). Each one
//! is stored behind a single object-safe capability: take the request, produce a
//! response.

use {
    axum::{body::Body, handler::Handler, response::Response},
    http::Request,
    std::{future::Future, marker::PhantomData, pin::Pin},
};

pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

pub(crate) trait ErasedHandler: Send + Sync + 'static {
    fn call(&self, request: Request<Body>) -> BoxFuture;
}

pub(crate) struct HandlerFn<H, T> {
    handler: H,
    _marker: PhantomData<fn() -> T>,
}

impl<H, T> HandlerFn<H, T> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<H, T> ErasedHandler for HandlerFn<H, T>
where
    H: Handler<T, ()>,
    T: 'static,
{
    fn call(&self, request: Request<Body>) -> BoxFuture {
        Box::pin(<H as Handler<T, ()>>::call(self.handler.clone(), request, ()))
    }
}
