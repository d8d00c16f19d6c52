use http::Method;

use crate::error::Result;
use crate::middleware::{Middleware, Next};
use crate::request::{Credentials, FetchOptions, RequestInit};
use crate::response::Envelope;

/// Fills in `credentials = same-origin`, `method = GET` and `is_parsed = true` when the request
/// does not set them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOptions;

impl DefaultOptions {
    pub fn apply(&self, mut options: FetchOptions) -> FetchOptions {
        options.request = options.request.merge(RequestInit {
            credentials: Some(Credentials::SameOrigin),
            method: Some(Method::GET),
            ..Default::default()
        });
        options.is_parsed.get_or_insert(true);
        options
    }
}

#[async_trait::async_trait]
impl Middleware for DefaultOptions {
    async fn handle(&self, options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
        next.run(self.apply(options)).await
    }
}
