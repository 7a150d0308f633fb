//! The API client and its request pipeline.
//!
//! [`Client`] is the entry point resource wrappers build on. It resolves
//! relative paths against the configured origin, layers headers, performs a
//! single network exchange, and decodes the response. Use [`ClientBuilder`]
//! to configure and create clients.

use crate::{
    callback::{self, Callback},
    response, Body, Error, RequestSpec, Result,
};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default API origin.
pub const DEFAULT_ORIGIN: &str = "https://api.postwing.com";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// A client for the provider's REST API.
///
/// The client holds the API key, origin, and default headers, all immutable
/// after construction. It is cheap to clone and safe to share: concurrent
/// calls run independent exchanges over a common connection pool with no
/// shared mutable state.
///
/// Each boundary operation takes a [`RequestSpec`] plus an optional
/// [`Callback`]; see the [`callback`](crate::callback) module for how the two
/// delivery modes interact.
///
/// # Examples
///
/// ```no_run
/// use postwing::{Client, RequestSpec};
///
/// # async fn example() -> Result<(), postwing::Error> {
/// let client = Client::builder()
///     .api_key("my-key")
///     .stack_identity("my-app/2.1")
///     .build()?;
///
/// let templates = client
///     .get(RequestSpec::new("templates"), None)
///     .await
///     .expect("no callback was supplied")?;
/// println!("{:?}", templates.as_json());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http_client: reqwest::Client,
    /// `{origin}/api/{version}/`, precomputed for relative resolution.
    base: Url,
    api_key: HeaderValue,
    default_headers: HeaderMap,
    debug: bool,
}

impl Client {
    /// Creates a client with the given API key and default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Client::builder().api_key(api_key).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Makes a GET request.
    ///
    /// GET responses are expected to be JSON even when the server omits the
    /// content-type, so JSON decoding is attempted with a plain-text fallback.
    pub async fn get(
        &self,
        spec: RequestSpec,
        callback: Option<Callback>,
    ) -> Option<Result<Body>> {
        let spec = spec.method(Method::GET).expect_json();
        callback::settle(self.dispatch(spec).await, callback)
    }

    /// Makes a POST request.
    pub async fn post(
        &self,
        spec: RequestSpec,
        callback: Option<Callback>,
    ) -> Option<Result<Body>> {
        let spec = spec.method(Method::POST);
        callback::settle(self.dispatch(spec).await, callback)
    }

    /// Makes a PUT request.
    pub async fn put(
        &self,
        spec: RequestSpec,
        callback: Option<Callback>,
    ) -> Option<Result<Body>> {
        let spec = spec.method(Method::PUT);
        callback::settle(self.dispatch(spec).await, callback)
    }

    /// Makes a DELETE request.
    pub async fn delete(
        &self,
        spec: RequestSpec,
        callback: Option<Callback>,
    ) -> Option<Result<Body>> {
        let spec = spec.method(Method::DELETE);
        callback::settle(self.dispatch(spec).await, callback)
    }

    /// Dispatches a request with the method already set on the spec.
    ///
    /// The verb shortcuts are thin wrappers over this; it exists for callers
    /// that build fully-formed specs, e.g. when following paginated links.
    pub async fn request(
        &self,
        spec: RequestSpec,
        callback: Option<Callback>,
    ) -> Option<Result<Body>> {
        callback::settle(self.dispatch(spec).await, callback)
    }

    /// Delivers an already-known error through the callback/future duality.
    ///
    /// Resource wrappers use this for validation failures ("template id is
    /// required") so their operations behave identically to network calls:
    /// the error reaches the callback when one is supplied and is returned
    /// otherwise. No network exchange takes place.
    pub fn reject(&self, error: Error, callback: Option<Callback>) -> Option<Result<Body>> {
        callback::settle(Err(error), callback)
    }

    /// Runs the request pipeline: resolve, compose headers, exchange, decode.
    async fn dispatch(&self, spec: RequestSpec) -> Result<Body> {
        if spec.path.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "a request path is required".to_string(),
            ));
        }

        let url = self.resolve_url(&spec)?;
        let headers = self.compose_headers(&spec);

        tracing::debug!(
            method = %spec.method,
            url = %url,
            compress = spec.compress,
            "Executing HTTP request"
        );

        let mut request = self
            .inner
            .http_client
            .request(spec.method.clone(), url.clone())
            .headers(headers);

        if let Some(body) = &spec.json_body {
            request = request.json(body);
        }

        // Exactly one exchange; transport failures surface unchanged.
        let response = request.send().await?;

        let status = response.status();
        let response_headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            url = %url,
            "Received HTTP response"
        );

        if status.is_client_error() || status.is_server_error() {
            let bytes = response.bytes().await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Failed to read failure response body");
                Default::default()
            });
            // Failure bodies arrive gzip-encoded too when compression was
            // advertised; decompress before parsing the errors envelope.
            let raw_response = response::failure_text(&response_headers, &bytes, status);

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            }

            return Err(api_error(status, &raw_response));
        }

        let plan = response::plan(&response_headers, spec.expect_json);
        let bytes = response.bytes().await?;
        let mut body = response::decode(plan, &bytes, status)?;

        if spec.debug.unwrap_or(self.inner.debug) {
            response::attach_debug(&mut body, debug_metadata(&url, status, &response_headers));
        }

        Ok(body)
    }

    /// Resolves the spec's path to an absolute URL.
    ///
    /// Paths that already carry an `http(s)` scheme are used unchanged, so
    /// pagination links returned by the API pass through the same pipeline.
    /// Anything else is joined against `{origin}/api/{version}/`. Query
    /// parameters from the spec are appended either way.
    fn resolve_url(&self, spec: &RequestSpec) -> Result<Url> {
        let mut url = if spec.path.starts_with("http://") || spec.path.starts_with("https://") {
            Url::parse(&spec.path)?
        } else {
            self.inner.base.join(&spec.path)?
        };

        for (key, value) in &spec.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url)
    }

    /// Layers the outgoing header set.
    ///
    /// Precedence, lowest to highest: client defaults, per-call extras, then
    /// `Authorization` forced to the configured API key. Callers can never
    /// omit or override authentication.
    fn compose_headers(&self, spec: &RequestSpec) -> HeaderMap {
        let mut headers = self.inner.default_headers.clone();

        for (name, value) in &spec.extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        if spec.compress {
            headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        }

        headers.insert(header::AUTHORIZATION, self.inner.api_key.clone());

        headers
    }
}

/// Builds an [`Error::Api`] from a failure response.
///
/// The body is parsed as JSON on a best-effort basis for the provider's
/// `errors` array; anything unparseable yields an empty list.
fn api_error(status: http::StatusCode, raw_response: &str) -> Error {
    #[derive(serde::Deserialize)]
    struct ErrorsEnvelope {
        #[serde(default)]
        errors: Vec<crate::ApiErrorDetail>,
    }

    let errors = serde_json::from_str::<ErrorsEnvelope>(raw_response)
        .map(|envelope| envelope.errors)
        .unwrap_or_default();

    Error::Api {
        status,
        message: status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string(),
        errors,
    }
}

/// Builds the metadata object attached under `debug` when debugging is on.
fn debug_metadata(url: &Url, status: http::StatusCode, headers: &HeaderMap) -> serde_json::Value {
    let headers: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                serde_json::Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();

    serde_json::json!({
        "url": url.as_str(),
        "status": status.as_u16(),
        "headers": headers,
    })
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use postwing::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), postwing::Error> {
/// let client = ClientBuilder::new()
///     .api_key("my-key")
///     .origin("https://api.eu.postwing.com")?
///     .api_version("v1")
///     .default_header("X-Team", "growth")?
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    origin: Option<Url>,
    api_version: String,
    extra_default_headers: HeaderMap,
    debug: bool,
    stack_identity: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            origin: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            extra_default_headers: HeaderMap::new(),
            debug: false,
            stack_identity: None,
            timeout: None,
        }
    }

    /// Sets the API key. Required.
    ///
    /// Credentials are injected explicitly; callers that want an environment
    /// fallback read the variable themselves before construction.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the API origin (scheme, host, and port).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn origin(mut self, origin: impl AsRef<str>) -> Result<Self> {
        self.origin = Some(Url::parse(origin.as_ref())?);
        Ok(self)
    }

    /// Overrides the API version path segment.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Adds a default header included in every request.
    ///
    /// Per-call headers on a [`RequestSpec`] take precedence over these.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.extra_default_headers.insert(name, value);
        Ok(self)
    }

    /// Enables debug attachment for every call.
    ///
    /// Individual calls can override this with
    /// [`RequestSpec::debug`](crate::RequestSpec::debug).
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Prepends an embedding-application identifier to the User-Agent.
    pub fn stack_identity(mut self, identity: impl Into<String>) -> Self {
        self.stack_identity = Some(identity.into());
        self
    }

    /// Sets a request timeout, enforced by the transport layer.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no API key was provided, the key is
    /// empty or not a valid header value, or the transport client cannot be
    /// constructed.
    pub fn build(self) -> Result<Client> {
        let api_key = match self.api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                return Err(Error::Configuration(
                    "Client requires an API key".to_string(),
                ))
            }
        };

        let mut api_key = HeaderValue::try_from(api_key)
            .map_err(|e| Error::Configuration(format!("Invalid API key: {}", e)))?;
        api_key.set_sensitive(true);

        let origin = match self.origin {
            Some(origin) => origin,
            // The default is a compile-time constant and always parses.
            None => Url::parse(DEFAULT_ORIGIN)
                .map_err(|e| Error::Configuration(format!("Invalid default origin: {}", e)))?,
        };

        let base = origin
            .join(&format!("api/{}/", self.api_version))
            .map_err(|e| Error::Configuration(format!("Invalid API version segment: {}", e)))?;

        let mut default_headers = HeaderMap::new();
        let user_agent = user_agent(self.stack_identity.as_deref());
        default_headers.insert(
            header::USER_AGENT,
            HeaderValue::try_from(user_agent)
                .map_err(|e| Error::Configuration(format!("Invalid stack identity: {}", e)))?,
        );
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in &self.extra_default_headers {
            default_headers.insert(name.clone(), value.clone());
        }

        let mut http_client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http_client = http_client.timeout(timeout);
        }
        let http_client = http_client
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base,
                api_key,
                default_headers,
                debug: self.debug,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies the library, its version, and any embedding application.
fn user_agent(stack_identity: Option<&str>) -> String {
    let library = format!("postwing-rust/{}", env!("CARGO_PKG_VERSION"));
    match stack_identity {
        Some(identity) => format!("{} {}", identity, library),
        None => library,
    }
}
