use http::StatusCode;
use thiserror::Error;

use crate::response::Envelope;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// There was an error running some middleware
    #[error("Middleware error: {0}")]
    Middleware(#[from] anyhow::Error),
    /// Error from the underlying reqwest client
    #[error("Request error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Error from a transport other than reqwest
    #[error("Transport error: {0}")]
    Transport(#[source] anyhow::Error),
    /// The response body could not be decoded as JSON
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),
    /// The response status was outside of `200..400`
    #[error("Unsuccessful response: {}", .0.status())]
    Unsuccessful(Box<Envelope>),
}

impl Error {
    pub fn middleware<E>(err: E) -> Self
    where
        E: 'static + Send + Sync + std::error::Error,
    {
        Error::Middleware(err.into())
    }

    pub fn transport<E>(err: E) -> Self
    where
        E: 'static + Send + Sync + std::error::Error,
    {
        Error::Transport(err.into())
    }

    /// Returns the request URL related to this error, if known.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Reqwest(e) => e.url().map(|url| url.as_str()),
            Error::Unsuccessful(envelope) => Some(envelope.url()),
            Error::Middleware(_) | Error::Transport(_) | Error::Decode(_) => None,
        }
    }

    /// Returns true if the transport failed to produce a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Reqwest(_) | Error::Transport(_))
    }

    /// Returns true if the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// Returns true if the response was classified as unsuccessful.
    pub fn is_status(&self) -> bool {
        matches!(self, Error::Unsuccessful(_))
    }

    /// Returns true if some middleware failed.
    pub fn is_middleware(&self) -> bool {
        matches!(self, Error::Middleware(_))
    }

    /// Returns the status code, if the error was generated from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Unsuccessful(envelope) => Some(envelope.status()),
            Error::Reqwest(e) => e.status(),
            Error::Middleware(_) | Error::Transport(_) | Error::Decode(_) => None,
        }
    }

    /// The envelope of an unsuccessful response.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Error::Unsuccessful(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Consumes the error, returning the envelope of an unsuccessful response.
    pub fn into_envelope(self) -> std::result::Result<Envelope, Self> {
        match self {
            Error::Unsuccessful(envelope) => Ok(*envelope),
            other => Err(other),
        }
    }
}
