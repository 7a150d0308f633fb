//! Per-call request options.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::collections::BTreeMap;

/// Options for a single API call.
///
/// A `RequestSpec` describes everything about one request: the target path (or
/// a fully resolved URL), the HTTP method, query parameters, an optional JSON
/// body, extra headers, and whether to accept a compressed transfer. Specs are
/// created per call by resource wrappers and consumed once by the pipeline.
///
/// # Examples
///
/// ```
/// use postwing::RequestSpec;
///
/// let spec = RequestSpec::new("message-events")
///     .query_param("from", "2014-01-01T00:00")
///     .query_list("events", ["bounce", "out_of_band"]);
/// ```
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// A resource path relative to `{origin}/api/{version}/`, or an absolute
    /// `http(s)` URL used unchanged (e.g. a paginated `next` link).
    pub path: String,

    /// The HTTP method. Normally set by the verb shortcuts on
    /// [`Client`](crate::Client).
    pub method: Method,

    /// Query parameters appended to the resolved URL.
    ///
    /// Ordered so that resolved URLs are deterministic.
    pub query_params: BTreeMap<String, String>,

    /// Optional JSON request body.
    pub json_body: Option<serde_json::Value>,

    /// Extra headers for this call. Merged over the client defaults; the
    /// `Authorization` header is always overridden by the pipeline.
    pub extra_headers: HeaderMap,

    /// Whether to advertise gzip transfer acceptance. Defaults to `true`.
    pub compress: bool,

    /// Whether to attempt JSON decoding even without a JSON content-type.
    /// Set by [`Client::get`](crate::Client::get).
    pub expect_json: bool,

    /// Per-call override of the client-level debug flag.
    pub debug: Option<bool>,
}

impl RequestSpec {
    /// Creates a spec for the given path with method GET and default options.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            query_params: BTreeMap::new(),
            json_body: None,
            extra_headers: HeaderMap::new(),
            compress: true,
            expect_json: false,
            debug: None,
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a single query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Adds a list-valued query parameter, joined with commas.
    ///
    /// This is the provider's convention for array parameters, e.g.
    /// `events=bounce,delivery`.
    pub fn query_list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.query_params.insert(key.into(), joined);
        self
    }

    /// Sets the JSON request body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    /// value cannot be represented as JSON.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, crate::Error> {
        let value = serde_json::to_value(body).map_err(|e| {
            crate::Error::InvalidArgument(format!("request body is not valid JSON: {}", e))
        })?;
        self.json_body = Some(value);
        Ok(self)
    }

    /// Adds an extra header for this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::InvalidArgument(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::InvalidArgument(format!("Invalid header value: {}", e)))?;
        self.extra_headers.insert(name, value);
        Ok(self)
    }

    /// Disables compressed transfer for this call.
    pub fn no_compression(mut self) -> Self {
        self.compress = false;
        self
    }

    /// Overrides the client-level debug flag for this call.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = Some(enabled);
        self
    }

    pub(crate) fn expect_json(mut self) -> Self {
        self.expect_json = true;
        self
    }
}
