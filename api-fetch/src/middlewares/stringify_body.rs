use crate::body::Body;
use crate::error::{Error, Result};
use crate::middleware::{Middleware, Next};
use crate::request::FetchOptions;
use crate::response::Envelope;

/// Encodes a structured body ([`Body::Json`]) to JSON text.
///
/// The encoded body stays tagged as JSON ([`Body::SerializedJson`]). Any other body, strings
/// included, is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringifyBody;

impl StringifyBody {
    pub fn apply(&self, mut options: FetchOptions) -> Result<FetchOptions> {
        if let Some(Body::Json(value)) = &options.request.body {
            let text = serde_json::to_string(value).map_err(Error::middleware)?;
            options.request.body = Some(Body::SerializedJson(text));
        }
        Ok(options)
    }
}

#[async_trait::async_trait]
impl Middleware for StringifyBody {
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        next.run(self.apply(options)?).await
    }
}
