/// [`fetch_span!`] creates a new [`tracing::Span`] for a pipeline call.
///
/// It takes the span name (used as `otel.name`) and the [`FetchOptions`] of the request, plus
/// an optional level (INFO by default) and extra fields.
///
/// ```
/// use api_fetch::FetchOptions;
/// use api_fetch_tracing::fetch_span;
///
/// let options = FetchOptions::new("https://example.com/payments");
/// let span = fetch_span!(name = "list payments", options);
/// let debug_span = fetch_span!(
///     level = tracing::Level::DEBUG,
///     name = "list payments",
///     options,
///     payment.page = 2
/// );
/// ```
///
/// [`FetchOptions`]: api_fetch::FetchOptions
#[macro_export]
macro_rules! fetch_span {
    // Span at default INFO level, with no additional fields
    (name=$name:expr, $options:expr) => {
        $crate::fetch_span!(name=$name, $options,)
    };
    // Span with no additional fields but custom level
    (level=$level:expr, name=$name:expr, $options:expr) => {
        $crate::fetch_span!(level=$level, name=$name, $options,)
    };
    // Span with additional fields, default INFO level
    (name=$name:expr, $options:expr, $($field:tt)*) => {
        $crate::fetch_span!(level=$crate::fetch_span::private::Level::INFO, name=$name, $options, $($field)*)
    };
    // Span with additional fields and custom level
    (level=$level:expr, name=$name:expr, $options:expr, $($field:tt)*) => {
        {
            let options: &$crate::fetch_span::private::FetchOptions = &$options;
            let method = options
                .request
                .method
                .as_ref()
                .map_or("GET", |method| method.as_str());
            let url = $crate::fetch_span::private::Url::parse(&options.url).ok();
            let scheme = url.as_ref().map_or("", |url| url.scheme());
            let host = url.as_ref().and_then(|url| url.host_str()).unwrap_or("");
            let host_port = url
                .as_ref()
                .and_then(|url| url.port_or_known_default())
                .unwrap_or(0) as i64;
            let user_agent = options
                .request
                .headers
                .as_ref()
                .and_then(|headers| headers.get("user-agent"))
                .and_then(|value| value.to_str().ok())
                .unwrap_or("");
            let otel_name = $name;

            macro_rules! request_span {
                ($lvl:expr) => {
                    $crate::fetch_span::private::span!(
                        $lvl,
                        "HTTP request",
                        http.method = %method,
                        http.scheme = %scheme,
                        http.host = %host,
                        net.host.port = %host_port,
                        otel.kind = "client",
                        otel.name = %otel_name,
                        otel.status_code = $crate::fetch_span::private::field::Empty,
                        http.user_agent = %user_agent,
                        http.status_code = $crate::fetch_span::private::field::Empty,
                        error.message = $crate::fetch_span::private::field::Empty,
                        error.cause_chain = $crate::fetch_span::private::field::Empty,
                        $($field)*
                    )
                }
            }

            let span = match $level {
                $crate::fetch_span::private::Level::TRACE => {
                    request_span!($crate::fetch_span::private::Level::TRACE)
                },
                $crate::fetch_span::private::Level::DEBUG => {
                    request_span!($crate::fetch_span::private::Level::DEBUG)
                },
                $crate::fetch_span::private::Level::INFO => {
                    request_span!($crate::fetch_span::private::Level::INFO)
                },
                $crate::fetch_span::private::Level::WARN => {
                    request_span!($crate::fetch_span::private::Level::WARN)
                },
                $crate::fetch_span::private::Level::ERROR => {
                    request_span!($crate::fetch_span::private::Level::ERROR)
                },
            };
            span
        }
    }
}

#[doc(hidden)]
pub mod private {
    #[doc(hidden)]
    pub use api_fetch::FetchOptions;
    #[doc(hidden)]
    pub use reqwest::Url;
    #[doc(hidden)]
    pub use tracing::{field, span, Level};
}
