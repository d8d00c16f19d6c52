use std::borrow::Cow;

use api_fetch::{Envelope, Error, FetchOptions, Result};
use reqwest::{StatusCode, Url};
use tracing::Span;

use crate::fetch_span;

/// The `http.method` field added to the span by [`fetch_span`]
pub const HTTP_METHOD: &str = "http.method";
/// The `http.scheme` field added to the span by [`fetch_span`]
pub const HTTP_SCHEME: &str = "http.scheme";
/// The `http.host` field added to the span by [`fetch_span`]
pub const HTTP_HOST: &str = "http.host";
/// The `http.url` field added to the span by [`SpanBackendWithUrl`]
pub const HTTP_URL: &str = "http.url";
/// The `host.port` field added to the span by [`fetch_span`]
pub const NET_HOST_PORT: &str = "net.host.port";
/// The `otel.kind` field added to the span by [`fetch_span`]
pub const OTEL_KIND: &str = "otel.kind";
/// The `otel.name` field added to the span by [`fetch_span`]
pub const OTEL_NAME: &str = "otel.name";
/// The `otel.status_code` field added to the span by [`fetch_span`]
pub const OTEL_STATUS_CODE: &str = "otel.status_code";
/// The `error.message` field added to the span by [`fetch_span`]
pub const ERROR_MESSAGE: &str = "error.message";
/// The `error.cause_chain` field added to the span by [`fetch_span`]
pub const ERROR_CAUSE_CHAIN: &str = "error.cause_chain";
/// The `http.status_code` field added to the span by [`fetch_span`]
pub const HTTP_STATUS_CODE: &str = "http.status_code";
/// The `http.user_agent` added to the span by [`fetch_span`]
pub const HTTP_USER_AGENT: &str = "http.user_agent";

/// [`FetchSpanBackend`] allows you to customise the span attached by
/// [`TracingMiddleware`] to each pipeline call.
///
/// [`TracingMiddleware`]: crate::TracingMiddleware
pub trait FetchSpanBackend {
    /// Initalizes a new span before the rest of the pipeline runs.
    fn on_request_start(options: &FetchOptions) -> Span;

    /// Runs after the rest of the pipeline has produced its outcome.
    fn on_request_end(span: &Span, outcome: &Result<Envelope>);
}

/// Populates default success/failure fields for a given [`fetch_span!`] span.
#[inline]
pub fn default_on_request_end(span: &Span, outcome: &Result<Envelope>) {
    match outcome {
        Ok(envelope) => default_on_request_success(span, envelope),
        Err(err) => default_on_request_failure(span, err),
    }
}

/// Populates default success fields for a given [`fetch_span!`] span.
#[inline]
pub fn default_on_request_success(span: &Span, envelope: &Envelope) {
    let status_code = envelope.status().as_u16() as i64;
    if let Some(span_status) = get_span_status(envelope.status()) {
        span.record(OTEL_STATUS_CODE, span_status);
    }
    span.record(HTTP_STATUS_CODE, status_code);
}

/// Populates default failure fields for a given [`fetch_span!`] span.
///
/// Unsuccessful responses are failures of the pipeline, so their status code is recorded
/// along with the error.
#[inline]
pub fn default_on_request_failure(span: &Span, e: &Error) {
    let error_message = e.to_string();
    let error_cause_chain = format!("{:?}", e);
    span.record(OTEL_STATUS_CODE, "ERROR");
    span.record(ERROR_MESSAGE, error_message.as_str());
    span.record(ERROR_CAUSE_CHAIN, error_cause_chain.as_str());
    if let Some(status) = e.status() {
        span.record(HTTP_STATUS_CODE, status.as_u16() as i64);
    }
}

/// The default [`FetchSpanBackend`] for [`TracingMiddleware`]. Note that it doesn't include
/// the `http.url` field in spans, you can use [`SpanBackendWithUrl`] to add it.
///
/// [`TracingMiddleware`]: crate::TracingMiddleware
pub struct DefaultSpanBackend;

impl FetchSpanBackend for DefaultSpanBackend {
    fn on_request_start(options: &FetchOptions) -> Span {
        fetch_span!(name = span_name(options), options)
    }

    fn on_request_end(span: &Span, outcome: &Result<Envelope>) {
        default_on_request_end(span, outcome)
    }
}

/// Similar to [`DefaultSpanBackend`] but also adds the `http.url` attribute to request spans.
///
/// [`TracingMiddleware`]: crate::TracingMiddleware
pub struct SpanBackendWithUrl;

impl FetchSpanBackend for SpanBackendWithUrl {
    fn on_request_start(options: &FetchOptions) -> Span {
        let url = match Url::parse(&options.url) {
            Ok(url) => remove_credentials(&url).into_owned(),
            Err(_) => options.url.clone(),
        };
        fetch_span!(name = span_name(options), options, http.url = %url)
    }

    fn on_request_end(span: &Span, outcome: &Result<Envelope>) {
        default_on_request_end(span, outcome)
    }
}

fn span_name(options: &FetchOptions) -> &str {
    options
        .request
        .method
        .as_ref()
        .map_or("GET", |method| method.as_str())
}

/// HTTP Mapping <https://github.com/open-telemetry/opentelemetry-specification/blob/main/specification/trace/semantic_conventions/http.md#status>
///
/// Maps the the http status to an Opentelemetry span status following the the specified convention above.
fn get_span_status(status: StatusCode) -> Option<&'static str> {
    match status.as_u16() {
        // Span Status MUST be left unset if HTTP status code was in the 1xx, 2xx or 3xx ranges.
        100..=399 => None,
        // For HTTP status codes in the 4xx range span status MUST be set to Error in case of
        // SpanKind.CLIENT.
        400..=499 => Some("ERROR"),
        _ => Some("ERROR"),
    }
}

/// Removes the username and/or password parts of the url, if present.
fn remove_credentials(url: &Url) -> Cow<'_, str> {
    if !url.username().is_empty() || url.password().is_some() {
        let mut url = url.clone();
        // Errors settings username/password are set when the URL can't have credentials, so
        // they're just ignored.
        url.set_username("")
            .and_then(|_| url.set_password(None))
            .ok();
        url.to_string().into()
    } else {
        url.as_ref().into()
    }
}
