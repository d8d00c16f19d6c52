use api_fetch::{Envelope, FetchOptions, Middleware, Next, Result};
use tracing::Instrument;

use crate::{DefaultSpanBackend, FetchSpanBackend};

/// Middleware for tracing pipeline calls.
///
/// Everything after it in the chain, transport included, runs inside its span.
pub struct TracingMiddleware<S: FetchSpanBackend> {
    span_backend: std::marker::PhantomData<S>,
}

impl<S: FetchSpanBackend> TracingMiddleware<S> {
    pub fn new() -> TracingMiddleware<S> {
        TracingMiddleware {
            span_backend: Default::default(),
        }
    }
}

impl<S: FetchSpanBackend> Clone for TracingMiddleware<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for TracingMiddleware<DefaultSpanBackend> {
    fn default() -> Self {
        TracingMiddleware::new()
    }
}

#[async_trait::async_trait]
impl<FetchSpan> Middleware for TracingMiddleware<FetchSpan>
where
    FetchSpan: FetchSpanBackend + Sync + Send + 'static,
{
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        let request_span = FetchSpan::on_request_start(&options);

        let outcome_future = async {
            let outcome = next.run(options).await;
            FetchSpan::on_request_end(&request_span, &outcome);
            outcome
        };

        outcome_future.instrument(request_span.clone()).await
    }
}
