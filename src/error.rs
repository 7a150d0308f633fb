//! Error types for the request pipeline.
//!
//! Every failure mode the pipeline can produce has its own variant, and variants
//! that originate from an HTTP response preserve the raw response text and status
//! code so callers can debug provider behavior without re-issuing the call.

use http::StatusCode;
use serde::Deserialize;

/// One provider-reported error object from a failure response body.
///
/// The API reports failures as `{"errors": [{"message": ..., "code": ...,
/// "description": ...}]}`. All fields are optional; anything the provider
/// sends beyond these is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiErrorDetail {
    /// Human-readable summary of the error.
    pub message: Option<String>,
    /// Provider-specific error code.
    pub code: Option<String>,
    /// Longer description, when the provider supplies one.
    pub description: Option<String>,
}

/// The main error type for pipeline operations.
///
/// # Examples
///
/// ```no_run
/// use postwing::{Client, Error, RequestSpec};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().api_key("my-key").build()?;
///
/// match client.get(RequestSpec::new("templates"), None).await.unwrap() {
///     Ok(body) => println!("Success: {:?}", body),
///     Err(Error::Api { status, errors, .. }) => {
///         eprintln!("API failure {}: {:?}", status, errors);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid client configuration, detected at construction.
    ///
    /// Covers a missing or empty API key, an unparseable origin, and invalid
    /// default header names or values. Never produced by a request call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A malformed or missing required call parameter.
    ///
    /// Raised before any network exchange, e.g. for an empty request path or
    /// an invalid per-call header. Collaborator modules also construct this
    /// variant for their own validation failures and hand it to
    /// [`Client::reject`](crate::Client::reject).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A network-level failure (connection refused, DNS failure, timeout).
    ///
    /// Wraps the underlying `reqwest::Error` unchanged; the pipeline never
    /// retries.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a failure status (outside the success range).
    ///
    /// `message` is the canonical reason phrase for the status; `errors` holds
    /// the provider-reported error objects parsed from the response body, or
    /// an empty list when the body is not JSON or carries no `errors` field.
    #[error("API error {status}: {message}")]
    Api {
        /// The HTTP status code of the failure response.
        status: StatusCode,
        /// The HTTP status message.
        message: String,
        /// Provider-reported error details, empty when none could be parsed.
        errors: Vec<ApiErrorDetail>,
    },

    /// The response body could not be decoded as its headers claimed.
    ///
    /// Covers gzip payloads that fail decompression and JSON content that
    /// fails to parse. The raw (post-decompression, when applicable) response
    /// text is preserved for debugging.
    #[error("Failed to decode response (status {status}): {detail}")]
    Decoding {
        /// The raw response body that failed to decode.
        raw_response: String,
        /// What went wrong while decoding.
        detail: String,
        /// The HTTP status code of the response.
        status: StatusCode,
    },

    /// An invalid URL was provided, either as an origin or an absolute path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    ///
    /// `Some(status)` for [`Error::Api`] and [`Error::Decoding`], `None`
    /// otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Decoding { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the provider-reported error details, if any.
    pub fn api_errors(&self) -> Option<&[ApiErrorDetail]> {
        match self {
            Error::Api { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Returns the raw response body if this error preserves one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Decoding { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
