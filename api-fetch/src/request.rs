use http::header::{HeaderMap, HeaderValue, IntoHeaderName};
use http::Method;
use serde::{Deserialize, Serialize};

use crate::body::Body;

/// Describes one outgoing request: its URL, whether the response body should be decoded, and
/// the options handed to the transport.
///
/// Middlewares receive the descriptor by value and forward a (possibly rewritten) one to
/// [`Next::run`](crate::Next::run).
///
/// ```
/// use api_fetch::FetchOptions;
/// use reqwest::header::HeaderValue;
/// use reqwest::Method;
///
/// let options = FetchOptions::new("https://example.com/api")
///     .method(Method::POST)
///     .header("x-custom-token", HeaderValue::from_static("123456789"))
///     .body(serde_json::json!({ "foo": "bar" }));
/// assert_eq!(options.request.method, Some(Method::POST));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub url: String,
    /// Decode the response body as JSON. `None` means `true`.
    pub is_parsed: Option<bool>,
    pub request: RequestInit,
}

impl FetchOptions {
    pub fn new(url: impl Into<String>) -> Self {
        FetchOptions {
            url: url.into(),
            is_parsed: None,
            request: RequestInit::default(),
        }
    }

    /// Whether the terminal step decodes the response body.
    pub fn parses_response(&self) -> bool {
        self.is_parsed.unwrap_or(true)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.request.method = Some(method);
        self
    }

    /// Add a header to this request, replacing any previous value for the same name.
    pub fn header<K>(mut self, key: K, value: HeaderValue) -> Self
    where
        K: IntoHeaderName,
    {
        self.request
            .headers
            .get_or_insert_with(HeaderMap::new)
            .insert(key, value);
        self
    }

    /// Merge a set of headers into the existing ones on this request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let merged = merge_headers(self.request.headers.take(), Some(headers));
        self.request.headers = merged;
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.request.credentials = Some(credentials);
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.request.cache = Some(cache);
        self
    }

    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.request.mode = Some(mode);
        self
    }

    pub fn redirect(mut self, redirect: RedirectPolicy) -> Self {
        self.request.redirect = Some(redirect);
        self
    }

    pub fn referrer_policy(mut self, policy: ReferrerPolicy) -> Self {
        self.request.referrer_policy = Some(policy);
        self
    }

    pub fn parsed(mut self, is_parsed: bool) -> Self {
        self.is_parsed = Some(is_parsed);
        self
    }
}

/// The transport options of a request. Every field is optional and an absent field means
/// "use the transport default": it never reaches the transport as a present value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInit {
    pub method: Option<Method>,
    pub headers: Option<HeaderMap>,
    pub body: Option<Body>,
    pub credentials: Option<Credentials>,
    pub cache: Option<CacheMode>,
    pub mode: Option<RequestMode>,
    pub redirect: Option<RedirectPolicy>,
    pub referrer_policy: Option<ReferrerPolicy>,
}

impl RequestInit {
    /// Fill the fields missing from `self` with the ones from `fallback`.
    ///
    /// Values already present on `self` always win. Headers are merged by name, with the
    /// values of `self` replacing those of `fallback`.
    pub fn merge(self, fallback: RequestInit) -> RequestInit {
        RequestInit {
            method: self.method.or(fallback.method),
            headers: merge_headers(fallback.headers, self.headers),
            body: self.body.or(fallback.body),
            credentials: self.credentials.or(fallback.credentials),
            cache: self.cache.or(fallback.cache),
            mode: self.mode.or(fallback.mode),
            redirect: self.redirect.or(fallback.redirect),
            referrer_policy: self.referrer_policy.or(fallback.referrer_policy),
        }
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        self == &RequestInit::default()
    }
}

/// `overrides` wins over `base` for every header name present in both.
fn merge_headers(base: Option<HeaderMap>, overrides: Option<HeaderMap>) -> Option<HeaderMap> {
    match (base, overrides) {
        (None, None) => None,
        (Some(headers), None) | (None, Some(headers)) => Some(headers),
        (Some(mut base), Some(overrides)) => {
            let mut current = None;
            for (name, value) in overrides {
                match name {
                    Some(name) => {
                        base.insert(name.clone(), value);
                        current = Some(name);
                    }
                    // repeated values of the previous name
                    None => {
                        if let Some(name) = &current {
                            base.append(name.clone(), value);
                        }
                    }
                }
            }
            Some(base)
        }
    }
}

macro_rules! fetch_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fetch_enum! {
    /// Whether cookies and HTTP auth are sent with the request.
    pub enum Credentials {
        Omit => "omit",
        SameOrigin => "same-origin",
        Include => "include",
    }
}

fetch_enum! {
    pub enum CacheMode {
        Default => "default",
        NoStore => "no-store",
        Reload => "reload",
        NoCache => "no-cache",
        ForceCache => "force-cache",
        OnlyIfCached => "only-if-cached",
    }
}

fetch_enum! {
    pub enum RequestMode {
        SameOrigin => "same-origin",
        NoCors => "no-cors",
        Cors => "cors",
        Navigate => "navigate",
    }
}

fetch_enum! {
    pub enum RedirectPolicy {
        Follow => "follow",
        Error => "error",
        Manual => "manual",
    }
}

fetch_enum! {
    pub enum ReferrerPolicy {
        NoReferrer => "no-referrer",
        NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
        Origin => "origin",
        OriginWhenCrossOrigin => "origin-when-cross-origin",
        SameOrigin => "same-origin",
        StrictOrigin => "strict-origin",
        StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
        UnsafeUrl => "unsafe-url",
    }
}
