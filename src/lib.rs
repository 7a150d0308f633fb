//! # Postwing - request pipeline for a transactional-email REST API
//!
//! Postwing is the core HTTP client for the Postwing email API, built on top
//! of `reqwest`. It resolves resource paths against a configured origin,
//! layers default and per-call headers under a forced `Authorization` header,
//! performs a single network exchange per call, and decodes JSON, text, and
//! gzip-compressed response bodies. Resource wrappers (templates,
//! subaccounts, recipient lists, ...) are thin collaborators that translate
//! their arguments into a [`RequestSpec`] and delegate to this pipeline.
//!
//! ## Quick Start
//!
//! ```no_run
//! use postwing::{Client, RequestSpec};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postwing::Error> {
//!     let client = Client::builder()
//!         .api_key("my-key")
//!         .build()?;
//!
//!     // List templates.
//!     let templates = client
//!         .get(RequestSpec::new("templates"), None)
//!         .await
//!         .expect("no callback was supplied")?;
//!     println!("templates: {:?}", templates.as_json());
//!
//!     // Create one.
//!     let spec = RequestSpec::new("templates")
//!         .json(&json!({"id": "welcome", "content": {"subject": "Hi"}}))?;
//!     client.post(spec, None).await.expect("no callback")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Callbacks
//!
//! Every operation also accepts an error-first completion callback, matching
//! the provider's other client libraries. When one is supplied the outcome is
//! delivered to it and the operation returns `None`:
//!
//! ```no_run
//! use postwing::{Callback, Client, RequestSpec};
//!
//! # async fn example() -> Result<(), postwing::Error> {
//! # let client = Client::builder().api_key("my-key").build()?;
//! let callback: Callback = Box::new(|outcome| match outcome {
//!     Ok(body) => println!("done: {:?}", body),
//!     Err(e) => eprintln!("failed: {}", e),
//! });
//!
//! let returned = client.get(RequestSpec::new("templates"), Some(callback)).await;
//! assert!(returned.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The pipeline never retries; every failure reaches the caller as an
//! [`Error`], with raw response text preserved where it helps debugging:
//!
//! ```no_run
//! use postwing::{Client, Error, RequestSpec};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().api_key("my-key").build()?;
//! match client.get(RequestSpec::new("templates"), None).await.unwrap() {
//!     Ok(body) => println!("Success: {:?}", body),
//!     Err(Error::Api { status, errors, .. }) => {
//!         eprintln!("API failure {}: {:?}", status, errors);
//!     }
//!     Err(Error::Decoding { raw_response, detail, .. }) => {
//!         eprintln!("Undecodable response ({}): {}", detail, raw_response);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **One pipeline for every resource** - verb shortcuts set the method and
//!   forward to a single dispatch routine
//! - **Forced authentication** - callers can never omit or override the
//!   `Authorization` header
//! - **Explicit response decoding** - a decision table over content-encoding
//!   and content-type handles gzip, JSON, text, and empty bodies
//! - **Callback/future duality** - every operation works with a future or an
//!   error-first callback
//! - **Structured logging** - request and response tracing with `tracing`
//! - **Connection pooling** - clients are cheap to clone and share

pub mod callback;
mod client;
mod error;
mod response;
mod spec;

pub use callback::Callback;
pub use client::{Client, ClientBuilder, DEFAULT_API_VERSION, DEFAULT_ORIGIN};
pub use error::{ApiErrorDetail, Error, Result};
pub use response::Body;
pub use spec::RequestSpec;
