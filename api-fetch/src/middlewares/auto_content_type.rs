use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::body::{Body, BodyKind};
use crate::error::Result;
use crate::middleware::{Middleware, Next};
use crate::request::FetchOptions;
use crate::response::Envelope;

/// The content types [`AutoContentType`] can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    None,
    Json,
    Form,
    FormData,
    Text,
    Blob,
    ArrayBuffer,
}

impl ContentType {
    pub fn from_kind(kind: BodyKind) -> Self {
        match kind {
            BodyKind::None => ContentType::None,
            BodyKind::Form => ContentType::Form,
            BodyKind::MultipartForm => ContentType::FormData,
            BodyKind::Blob => ContentType::Blob,
            BodyKind::Buffer => ContentType::ArrayBuffer,
            BodyKind::Structured => ContentType::Json,
            BodyKind::Text => ContentType::Text,
        }
    }

    /// The MIME type, `None` when there is no body to describe.
    pub fn mime(&self) -> Option<&'static str> {
        match self {
            ContentType::None => None,
            ContentType::Json => Some("application/json"),
            ContentType::Form => Some("application/x-www-form-urlencoded"),
            ContentType::FormData => Some("multipart/form-data"),
            ContentType::Text => Some("text/plain"),
            ContentType::Blob | ContentType::ArrayBuffer => Some("application/octet-stream"),
        }
    }
}

pub fn detect_content_type(body: Option<&Body>) -> ContentType {
    ContentType::from_kind(BodyKind::of(body))
}

/// Sets the `Content-Type` header from the kind of body the request carries, keeping every
/// other header. Requests without a body are forwarded untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoContentType;

impl AutoContentType {
    pub fn apply(&self, mut options: FetchOptions) -> FetchOptions {
        if let Some(mime) = detect_content_type(options.request.body.as_ref()).mime() {
            options
                .request
                .headers
                .get_or_insert_with(HeaderMap::new)
                .insert(CONTENT_TYPE, HeaderValue::from_static(mime));
        }
        options
    }
}

#[async_trait::async_trait]
impl Middleware for AutoContentType {
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        next.run(self.apply(options)).await
    }
}
