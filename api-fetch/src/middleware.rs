use std::sync::Arc;

use crate::error::Result;
use crate::request::FetchOptions;
use crate::response::Envelope;
use crate::send::send;
use crate::transport::Transport;

/// When attached to a pipeline, middleware is run on every request, in the order it was
/// attached.
///
/// # Example
///
/// ```
/// use api_fetch::{Envelope, FetchOptions, Middleware, Next, Result};
///
/// struct TransparentMiddleware;
///
/// #[async_trait::async_trait]
/// impl Middleware for TransparentMiddleware {
///     async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
///         next.run(options).await
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Middleware: 'static + Send + Sync {
    /// Invoked with the request descriptor before sending it. If you want to continue
    /// processing the request, you should explicitly call `next.run(options)`.
    ///
    /// Returning without calling `next` ends the pipeline: the transport is not called and the
    /// returned value is the result of the whole call.
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope>;
}

#[async_trait::async_trait]
impl<F> Middleware for F
where
    F: Send
        + Sync
        + 'static
        + for<'a> Fn(FetchOptions, Next<'a>) -> BoxFuture<'a, Result<Envelope>>,
{
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        (self)(options, next).await
    }
}

/// Next encapsulates the remaining middleware chain to run in [`Middleware::handle`]. You can
/// forward the request down the chain with [`run`].
///
/// Once every middleware has run, the descriptor goes to [`send`](crate::send).
///
/// [`Middleware::handle`]: Middleware::handle
/// [`run`]: Self::run
#[derive(Clone)]
pub struct Next<'a> {
    transport: &'a dyn Transport,
    middlewares: &'a [Arc<dyn Middleware>],
}

pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

impl<'a> Next<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, middlewares: &'a [Arc<dyn Middleware>]) -> Self {
        Next {
            transport,
            middlewares,
        }
    }

    pub fn run(mut self, options: FetchOptions) -> BoxFuture<'a, Result<Envelope>> {
        if let Some((current, rest)) = self.middlewares.split_first() {
            self.middlewares = rest;
            Box::pin(current.handle(options, self))
        } else {
            Box::pin(send(self.transport, options))
        }
    }

    /// Number of middlewares still to run before the transport is called.
    pub fn remaining(&self) -> usize {
        self.middlewares.len()
    }
}

/// A middleware rewriting the descriptor with a synchronous function before forwarding it.
///
/// ```
/// use api_fetch::{FetchOptions, MapOptions};
///
/// let versioned = MapOptions(|mut options: FetchOptions| -> api_fetch::Result<FetchOptions> {
///     options.url = format!("{}?v=2", options.url);
///     Ok(options)
/// });
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MapOptions<F>(pub F);

#[async_trait::async_trait]
impl<F> Middleware for MapOptions<F>
where
    F: Fn(FetchOptions) -> Result<FetchOptions> + Send + Sync + 'static,
{
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        let options = (self.0)(options)?;
        next.run(options).await
    }
}
