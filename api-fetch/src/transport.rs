use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{multipart, Client, Method};

use crate::body::{Body, MultipartForm};
use crate::error::{Error, Result};
use crate::request::RequestInit;
#[cfg(target_arch = "wasm32")]
use crate::request::RequestMode;
use crate::response::RawResponse;

/// The network call at the end of every pipeline.
///
/// [`reqwest::Client`] implements it; anything else able to issue a request (a test double, a
/// different HTTP stack) can be plugged in as well.
///
/// ```
/// use api_fetch::{RawResponse, RequestInit, Result, Transport};
/// use reqwest::header::HeaderMap;
/// use reqwest::StatusCode;
///
/// struct AlwaysOk;
///
/// #[async_trait::async_trait]
/// impl Transport for AlwaysOk {
///     async fn fetch(&self, url: &str, _init: RequestInit) -> Result<RawResponse> {
///         Ok(RawResponse {
///             url: url.to_owned(),
///             status: StatusCode::OK,
///             headers: HeaderMap::new(),
///             body: "{}".into(),
///         })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Transport: 'static + Send + Sync {
    /// Issue a request. Options absent from `init` take the transport default.
    async fn fetch(&self, url: &str, init: RequestInit) -> Result<RawResponse>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, url: &str, init: RequestInit) -> Result<RawResponse> {
        (**self).fetch(url, init).await
    }
}

#[async_trait::async_trait]
impl Transport for Client {
    async fn fetch(&self, url: &str, init: RequestInit) -> Result<RawResponse> {
        trace_ignored_policies(&init);
        let RequestInit {
            method,
            mut headers,
            body,
            mode,
            ..
        } = init;

        // reqwest picks the multipart boundary, which has to end up in the content type
        if let (Some(Body::Multipart(_)), Some(headers)) = (&body, headers.as_mut()) {
            headers.remove(CONTENT_TYPE);
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = mode;

        let mut builder = self.request(method.unwrap_or(Method::GET), url);
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        #[cfg(target_arch = "wasm32")]
        if mode == Some(RequestMode::NoCors) {
            builder = builder.fetch_mode_no_cors();
        }
        builder = match body {
            None => builder,
            Some(Body::Text(text)) | Some(Body::SerializedJson(text)) => builder.body(text),
            Some(Body::Json(value)) => {
                builder.body(serde_json::to_vec(&value).map_err(Error::transport)?)
            }
            Some(Body::Form(pairs)) => builder.form(&pairs),
            Some(Body::Multipart(form)) => builder.multipart(to_reqwest_form(form)?),
            Some(Body::Blob(bytes)) => builder.body(bytes),
            Some(Body::Buffer(buffer)) => builder.body(buffer),
        };

        let response = builder.send().await?;
        let url = response.url().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            url,
            status,
            headers,
            body,
        })
    }
}

#[cfg(feature = "tracing")]
fn trace_ignored_policies(init: &RequestInit) {
    if init.credentials.is_some()
        || init.cache.is_some()
        || init.redirect.is_some()
        || init.referrer_policy.is_some()
    {
        tracing::trace!(
            credentials = ?init.credentials,
            cache = ?init.cache,
            redirect = ?init.redirect,
            referrer_policy = ?init.referrer_policy,
            "browser-only fetch policies have no effect on a native client"
        );
    }
}

#[cfg(not(feature = "tracing"))]
fn trace_ignored_policies(_: &RequestInit) {}

fn to_reqwest_form(form: MultipartForm) -> Result<multipart::Form> {
    form.parts().try_fold(multipart::Form::new(), |reqwest_form, (name, part)| {
        let mut reqwest_part = multipart::Part::bytes(part.data().to_vec());
        if let Some(file_name) = part.get_file_name() {
            reqwest_part = reqwest_part.file_name(file_name.to_owned());
        }
        if let Some(mime) = part.get_mime() {
            reqwest_part = reqwest_part.mime_str(mime)?;
        }
        Ok(reqwest_form.part(name.to_owned(), reqwest_part))
    })
}
