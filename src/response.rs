//! Response body decoding.
//!
//! The pipeline hands the raw response payload to [`decode`], which applies a
//! small decision table over the transfer encoding and declared content type:
//!
//! | `content-encoding` | `content-type`     | result                          |
//! |--------------------|--------------------|---------------------------------|
//! | gzip               | any                | gunzip first, then as below     |
//! | identity           | `application/json` | parse as JSON                   |
//! | identity           | other, JSON forced | try JSON, fall back to text     |
//! | identity           | other              | opaque text                     |
//!
//! A zero-length payload always decodes to [`Body::Empty`], including under a
//! JSON content-type. Parsing an empty string as JSON would fail, and the
//! provider legitimately returns empty bodies (e.g. for DELETE), so emptiness
//! is resolved before content-type handling.

use crate::{Error, Result};
use flate2::read::GzDecoder;
use http::{header, HeaderMap, StatusCode};
use std::io::Read;

/// A decoded response body.
///
/// Responses are JSON for nearly every endpoint, but the pipeline also passes
/// through plain-text payloads (e.g. CSV exports) and empty bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A parsed JSON document.
    Json(serde_json::Value),
    /// An opaque text payload.
    Text(String),
    /// A zero-length payload.
    Empty,
}

impl Body {
    /// Returns the parsed JSON document, if this body is JSON.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the text payload, if this body is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Consumes the body and returns the JSON document, if any.
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for a zero-length payload.
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

/// How the payload bytes reach the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    Identity,
    Gzip,
}

/// What the decoder should make of the decompressed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// Declared JSON; a parse failure is a decoding error.
    Json,
    /// Not declared JSON but the caller expects it; fall back to text.
    MaybeJson,
    /// Opaque text.
    Text,
}

/// The decode strategy chosen from the response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodePlan {
    pub transfer: Transfer,
    pub shape: Shape,
}

/// Chooses the decode strategy for a response.
///
/// `expect_json` is set by the GET shortcut and forces a JSON parse attempt
/// when the server declares no JSON content-type.
pub(crate) fn plan(headers: &HeaderMap, expect_json: bool) -> DecodePlan {
    let transfer = match header_str(headers, header::CONTENT_ENCODING) {
        Some(encoding) if encoding.trim().eq_ignore_ascii_case("gzip") => Transfer::Gzip,
        _ => Transfer::Identity,
    };

    let declares_json = header_str(headers, header::CONTENT_TYPE)
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);

    let shape = if declares_json {
        Shape::Json
    } else if expect_json {
        Shape::MaybeJson
    } else {
        Shape::Text
    };

    DecodePlan { transfer, shape }
}

/// Decodes a successful response payload according to the chosen plan.
pub(crate) fn decode(plan: DecodePlan, bytes: &[u8], status: StatusCode) -> Result<Body> {
    if bytes.is_empty() {
        return Ok(Body::Empty);
    }

    let text = match plan.transfer {
        Transfer::Identity => String::from_utf8_lossy(bytes).into_owned(),
        Transfer::Gzip => gunzip(bytes, status)?,
    };

    if text.is_empty() {
        return Ok(Body::Empty);
    }

    match plan.shape {
        Shape::Json => match serde_json::from_str(&text) {
            Ok(value) => Ok(Body::Json(value)),
            Err(e) => {
                tracing::error!(error = %e, raw_response = %text, "Failed to parse JSON response");
                Err(Error::Decoding {
                    raw_response: text,
                    detail: format!("invalid JSON: {}", e),
                    status,
                })
            }
        },
        Shape::MaybeJson => match serde_json::from_str(&text) {
            Ok(value) => Ok(Body::Json(value)),
            Err(_) => Ok(Body::Text(text)),
        },
        Shape::Text => Ok(Body::Text(text)),
    }
}

/// Extracts the text of a failure response body.
///
/// Failure bodies travel under the same transfer encoding as success bodies,
/// so a gzip payload is decompressed before the provider's `errors` envelope
/// can be parsed out of it. Best-effort: a payload that will not decompress
/// falls back to the raw bytes rather than masking the HTTP failure itself.
pub(crate) fn failure_text(headers: &HeaderMap, bytes: &[u8], status: StatusCode) -> String {
    match plan(headers, false).transfer {
        Transfer::Gzip => gunzip(bytes, status).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Failed to decompress failure response body");
            String::from_utf8_lossy(bytes).into_owned()
        }),
        Transfer::Identity => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Decompresses a gzip payload in full before decoding continues.
fn gunzip(bytes: &[u8], status: StatusCode) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::Decoding {
            raw_response: String::from_utf8_lossy(bytes).into_owned(),
            detail: format!("gzip decompression failed: {}", e),
            status,
        })?;
    Ok(String::from_utf8_lossy(&decompressed).into_owned())
}

/// Attaches request metadata under the `debug` key of a JSON object body.
///
/// Best-effort: bodies that are not JSON objects are left untouched, and the
/// primary outcome of the call is never affected.
pub(crate) fn attach_debug(body: &mut Body, metadata: serde_json::Value) {
    if let Body::Json(serde_json::Value::Object(map)) = body {
        map.insert("debug".to_string(), metadata);
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name)?.to_str().ok()
}
