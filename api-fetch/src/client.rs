use std::fmt;
use std::sync::Arc;

use reqwest::Client;

use crate::error::Result;
use crate::middleware::{Middleware, Next};
use crate::middlewares::{DefaultOptions, StringifyBody};
use crate::request::FetchOptions;
use crate::response::Envelope;
use crate::transport::Transport;

/// Run `options` through `middlewares`, in order, then through the transport.
///
/// No middleware is added: use [`api_fetch`] for the default behaviour.
pub async fn core_api_fetch(
    transport: &dyn Transport,
    options: FetchOptions,
    middlewares: &[Arc<dyn Middleware>],
) -> Result<Envelope> {
    Next::new(transport, middlewares).run(options).await
}

/// Run `options` through [`DefaultOptions`], [`StringifyBody`] and then `middlewares`, in
/// order, then through the transport.
///
/// ```no_run
/// use api_fetch::{api_fetch, FetchOptions};
///
/// # async fn run() -> api_fetch::Result<()> {
/// let client = reqwest::Client::new();
/// let envelope = api_fetch(&client, FetchOptions::new("https://example.com/api"), &[]).await?;
/// println!("{:?}", envelope.data());
/// # Ok(())
/// # }
/// ```
pub async fn api_fetch(
    transport: &dyn Transport,
    options: FetchOptions,
    middlewares: &[Arc<dyn Middleware>],
) -> Result<Envelope> {
    let stack: Vec<Arc<dyn Middleware>> = default_stack()
        .into_iter()
        .chain(middlewares.iter().cloned())
        .collect();
    core_api_fetch(transport, options, &stack).await
}

fn default_stack() -> Vec<Arc<dyn Middleware>> {
    vec![Arc::new(DefaultOptions), Arc::new(StringifyBody)]
}

/// A `ClientBuilder` is used to build a [`FetchClient`].
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    middleware_stack: Vec<Arc<dyn Middleware>>,
}

impl ClientBuilder {
    /// A builder with an empty middleware chain.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport,
    {
        ClientBuilder {
            transport: Arc::new(transport),
            middleware_stack: Vec::new(),
        }
    }

    /// A builder whose chain starts with [`DefaultOptions`] and [`StringifyBody`], like
    /// [`api_fetch`].
    pub fn with_defaults<T>(transport: T) -> Self
    where
        T: Transport,
    {
        ClientBuilder {
            transport: Arc::new(transport),
            middleware_stack: default_stack(),
        }
    }

    /// This method allows creating a ClientBuilder
    /// from an existing FetchClient instance
    pub fn from_client(client: FetchClient) -> Self {
        Self {
            transport: client.transport,
            middleware_stack: client.middleware_stack.to_vec(),
        }
    }

    /// Convenience method to attach middleware.
    ///
    /// If you need to keep a reference to the middleware after attaching, use [`with_arc`].
    ///
    /// [`with_arc`]: Self::with_arc
    pub fn with<M>(self, middleware: M) -> Self
    where
        M: Middleware,
    {
        self.with_arc(Arc::new(middleware))
    }

    /// Add middleware to the chain. [`with`] is more ergonomic if you don't need the `Arc`.
    ///
    /// [`with`]: Self::with
    pub fn with_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware_stack.push(middleware);
        self
    }

    /// Returns a `FetchClient` using this builder configuration.
    pub fn build(self) -> FetchClient {
        FetchClient {
            transport: self.transport,
            middleware_stack: self.middleware_stack.into(),
        }
    }
}

/// A transport paired with the middleware chain every request goes through.
///
/// Cloning is cheap: the transport and the chain are shared.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    middleware_stack: Arc<[Arc<dyn Middleware>]>,
}

impl FetchClient {
    /// See [`ClientBuilder`] for a more ergonomic way to build `FetchClient` instances.
    pub fn new<T, M>(transport: T, middleware_stack: M) -> Self
    where
        T: Transport,
        M: Into<Arc<[Arc<dyn Middleware>]>>,
    {
        FetchClient {
            transport: Arc::new(transport),
            middleware_stack: middleware_stack.into(),
        }
    }

    /// Run `options` through the configured chain.
    pub async fn fetch(&self, options: FetchOptions) -> Result<Envelope> {
        core_api_fetch(&*self.transport, options, &self.middleware_stack).await
    }

    /// Run `options` through the configured chain followed by `extra`.
    pub async fn fetch_with(
        &self,
        options: FetchOptions,
        extra: &[Arc<dyn Middleware>],
    ) -> Result<Envelope> {
        let stack: Vec<Arc<dyn Middleware>> = self
            .middleware_stack
            .iter()
            .chain(extra)
            .cloned()
            .collect();
        core_api_fetch(&*self.transport, options, &stack).await
    }

    pub fn middleware_count(&self) -> usize {
        self.middleware_stack.len()
    }
}

/// Create a `FetchClient` with the default middlewares over a reqwest client.
impl From<Client> for FetchClient {
    fn from(client: Client) -> Self {
        ClientBuilder::with_defaults(client).build()
    }
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // middlewares and transport are opaque
        f.debug_struct("FetchClient")
            .field("middlewares", &self.middleware_stack.len())
            .finish_non_exhaustive()
    }
}

mod service {
    use std::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
    };

    use crate::{middleware::BoxFuture, Envelope, FetchClient, FetchOptions, Result};

    // this is meant to be semi-private, same as reqwest's pending
    pub struct Pending {
        inner: BoxFuture<'static, Result<Envelope>>,
    }

    impl Unpin for Pending {}

    impl Future for Pending {
        type Output = Result<Envelope>;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            self.inner.as_mut().poll(cx)
        }
    }

    impl tower_service::Service<FetchOptions> for FetchClient {
        type Response = Envelope;
        type Error = crate::Error;
        type Future = Pending;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, options: FetchOptions) -> Self::Future {
            let client = self.clone();
            Pending {
                inner: Box::pin(async move { client.fetch(options).await }),
            }
        }
    }
}
