//! Tracing middleware for [`api_fetch`] pipelines.
//!
//! Attach [`TracingMiddleware`] to a chain to get one span per call, with the request method,
//! host and outcome recorded on it.
//!
//! In this example we define a custom span backend which names spans after the url and tags
//! them with the API version.
//! ```rust
//! use api_fetch::{ClientBuilder, Envelope, FetchOptions, Result};
//! use api_fetch_tracing::{default_on_request_end, fetch_span, FetchSpanBackend, TracingMiddleware};
//! use tracing::Span;
//!
//! pub struct PaymentsSpan;
//!
//! impl FetchSpanBackend for PaymentsSpan {
//!     fn on_request_start(options: &FetchOptions) -> Span {
//!         fetch_span!(name = format!("payments {}", options.url), options, api.version = "v2")
//!     }
//!
//!     fn on_request_end(span: &Span, outcome: &Result<Envelope>) {
//!         default_on_request_end(span, outcome);
//!     }
//! }
//!
//! let client = ClientBuilder::with_defaults(reqwest::Client::new())
//!     .with(TracingMiddleware::<PaymentsSpan>::new())
//!     .build();
//! ```

#[doc(hidden)]
pub mod fetch_span;
mod middleware;
mod span_backend;

pub use middleware::TracingMiddleware;
pub use span_backend::{
    default_on_request_end, default_on_request_failure, default_on_request_success,
    DefaultSpanBackend, FetchSpanBackend, SpanBackendWithUrl, ERROR_CAUSE_CHAIN, ERROR_MESSAGE,
    HTTP_HOST, HTTP_METHOD, HTTP_SCHEME, HTTP_STATUS_CODE, HTTP_URL, HTTP_USER_AGENT,
    NET_HOST_PORT, OTEL_KIND, OTEL_NAME, OTEL_STATUS_CODE,
};
