use bytes::Bytes;
use http::header::HeaderMap;
use http::StatusCode;
use serde::de::DeserializeOwned;

/// What a [`Transport`](crate::Transport) hands back: the response metadata and the whole body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The normalized result of a pipeline: response metadata, the raw body and, when decoding
/// ran, the decoded JSON payload.
///
/// Middlewares which answer without reaching the network (caches, mocks) build their own:
///
/// ```
/// use api_fetch::Envelope;
/// use reqwest::StatusCode;
///
/// let cached = Envelope::new("https://example.com/api", StatusCode::OK)
///     .with_data(serde_json::json!({ "foo": "bar" }));
/// assert!(cached.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct Envelope {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    data: Option<serde_json::Value>,
}

impl Envelope {
    pub fn new(url: impl Into<String>, status: StatusCode) -> Self {
        Envelope {
            url: url.into(),
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            data: None,
        }
    }

    pub(crate) fn from_raw(raw: RawResponse, data: Option<serde_json::Value>) -> Self {
        let RawResponse {
            url,
            status,
            headers,
            body,
        } = raw;
        Envelope {
            url,
            status,
            headers,
            body,
            data,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The URL of the response, after any redirect the transport followed.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw response body, as received from the transport.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The raw response body as text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// The decoded payload. `None` when the request was sent with `is_parsed = false`.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<serde_json::Value> {
        self.data
    }

    /// Deserialize the decoded payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        self.data.clone().map(serde_json::from_value).transpose()
    }

    /// `200..400` is a success, anything else is not.
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }
}

pub(crate) fn is_success(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}
