use crate::error::{Error, Result};
use crate::request::FetchOptions;
use crate::response::Envelope;
use crate::transport::Transport;

/// The terminal step of every pipeline.
///
/// Hands the transport options of `options` to `transport`, decodes the response body as JSON
/// unless `is_parsed` is `false`, then classifies the response: a status in `200..400` resolves
/// to the [`Envelope`], anything else fails with [`Error::Unsuccessful`] carrying it.
///
/// Decoding happens before classification, so an error page which is not JSON fails with
/// [`Error::Decode`].
pub async fn send<T>(transport: &T, options: FetchOptions) -> Result<Envelope>
where
    T: Transport + ?Sized,
{
    let FetchOptions {
        url,
        is_parsed,
        request,
    } = options;
    let is_parsed = is_parsed.unwrap_or(true);

    #[cfg(feature = "tracing")]
    tracing::debug!(url = %url, method = ?request.method, "sending request");

    let raw = transport.fetch(&url, request).await?;
    let data = if is_parsed {
        Some(serde_json::from_slice(&raw.body).map_err(Error::Decode)?)
    } else {
        None
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(url = %raw.url, status = %raw.status, is_parsed, "received response");

    let envelope = Envelope::from_raw(raw, data);
    if envelope.is_success() {
        Ok(envelope)
    } else {
        Err(Error::Unsuccessful(Box::new(envelope)))
    }
}
