//! Error types for the REST client.
//!
//! # Design
//! Every failure of a bound request is returned synchronously to the caller
//! as one `Error` value. Non-2xx responses land in `Status` with the raw
//! status code, unless an error hook produced its own error, which is carried
//! unchanged in `Hook`. Errors from codecs, transports and hooks are kept as
//! boxed sources so callers can downcast them.

use thiserror::Error;

/// Boxed error used at the codec, transport and hook seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `Client` construction and `BoundRequest` invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The base URL is not a valid absolute URL.
    #[error("invalid base url `{url}`: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The base URL is absolute but cannot carry a path (`mailto:`, `data:`).
    #[error("base url `{0}` cannot be used as a base for request paths")]
    NotABase(String),

    /// `content_length` disagrees with the length of an in-memory body.
    #[error("declared content length {declared} does not match body length {actual}")]
    ContentLength { declared: u64, actual: u64 },

    /// The codec could not serialize the request body.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] BoxError),

    /// An encodable body was supplied but the client has no codec.
    #[error("request body needs a codec but the client has none configured")]
    MissingCodec,

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The server returned a status outside 200..=299 and no error hook
    /// replaced it.
    #[error("http status {0}")]
    Status(u16),

    /// Error produced by an error hook; replaces `Status`.
    #[error(transparent)]
    Hook(BoxError),

    /// The response body could not be decoded into the destination.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] BoxError),

    /// Client configuration is invalid or incomplete.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Status code carried by `Error::Status`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status(status) => Some(*status),
            _ => None,
        }
    }
}
