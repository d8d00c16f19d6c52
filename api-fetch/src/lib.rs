//! This crate provides [`api_fetch`], which sends a request through a chain of middlewares
//! before handing it to a [`Transport`] (usually a [`reqwest::Client`]), decodes the JSON
//! response and classifies it by status code.
//!
//! Each middleware receives the request descriptor ([`FetchOptions`]) and the rest of the chain
//! ([`Next`]). It may rewrite the descriptor before forwarding it, look at the result on its way
//! back, or answer on its own without calling `next` at all:
//!
//! ```
//! use api_fetch::{api_fetch, Envelope, FetchOptions, Middleware, Next, Result};
//! use std::sync::Arc;
//!
//! struct ApiPrefix;
//!
//! #[async_trait::async_trait]
//! impl Middleware for ApiPrefix {
//!     async fn handle(&self, mut options: FetchOptions, next: Next<'_>) -> Result<Envelope> {
//!         options.url = format!("https://example.com/api{}", options.url);
//!         next.run(options).await
//!     }
//! }
//!
//! async fn run() -> Result<()> {
//!     let client = reqwest::Client::new();
//!     let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(ApiPrefix)];
//!     let envelope = api_fetch(&client, FetchOptions::new("/users"), &middlewares).await?;
//!     println!("{} {:?}", envelope.status(), envelope.data());
//!     Ok(())
//! }
//! ```
//!
//! [`api_fetch`] always runs [`DefaultOptions`] and [`StringifyBody`] first;
//! [`core_api_fetch`] runs only the middlewares it is given. [`ClientBuilder`] bundles a
//! transport with a chain for repeated use.
mod body;
mod client;
mod error;
mod middleware;
pub mod middlewares;
mod request;
mod response;
mod send;
mod transport;

pub use body::{Body, BodyKind, MultipartForm, Part};
pub use client::{api_fetch, core_api_fetch, ClientBuilder, FetchClient};
pub use error::{Error, Result};
pub use middleware::{BoxFuture, MapOptions, Middleware, Next};
pub use middlewares::{detect_content_type, AutoContentType, ContentType, DefaultOptions, StringifyBody};
pub use request::{
    CacheMode, Credentials, FetchOptions, RedirectPolicy, ReferrerPolicy, RequestInit,
    RequestMode,
};
pub use response::{Envelope, RawResponse};
pub use send::send;
pub use transport::Transport;
