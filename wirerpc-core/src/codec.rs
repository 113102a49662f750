//! JSON text helpers for JSON-RPC messages
//!
//! The message types render to and parse from a [`WireMap`]. Transports that
//! speak JSON text can use these helpers instead of calling `serde_json`
//! themselves. Every decode goes through the validating `from_wire` entry
//! points, so the text path enforces exactly the same rules as the map path.
//!
//! # Error Mapping
//!
//! - Text that is not JSON → `Error::Serialization`
//! - JSON that is not an object → validated as an empty mapping, which fails
//!   with "missing protocol version"
//! - Everything else → the error returned by `from_wire`
//!
//! Every encoded and rejected message is counted in
//! [`codec_metrics`](crate::metrics::codec_metrics).
//!
//! # Examples
//!
//! ```rust
//! use wirerpc_core::{codec, JsonRpcRequest};
//!
//! let request = JsonRpcRequest::call("ping", 1);
//! let json = codec::encode_request(&request).unwrap();
//! assert!(json.contains("\"method\":\"ping\""));
//!
//! let response = codec::decode_response(r#"{"jsonrpc":"2.0","result":"pong","id":1}"#).unwrap();
//! assert_eq!(response.result(), Some(&serde_json::json!("pong")));
//! ```

use crate::error::{Error, Result};
use crate::metrics::codec_metrics;
use crate::types::{JsonRpcRequest, JsonRpcResponse, WireMap};
use serde::Serialize;
use serde_json::Value;

/// Encode any serializable value to a JSON string
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode JSON text to a wire mapping
///
/// A top-level value that is not an object yields an empty mapping.
///
/// # Errors
///
/// Returns `Error::Serialization` if `data` is not valid JSON.
pub fn decode_wire(data: &str) -> Result<WireMap> {
    let value: Value =
        serde_json::from_str(data).map_err(|e| Error::Serialization(e.to_string()))?;

    Ok(match value {
        Value::Object(wire) => wire,
        _ => WireMap::new(),
    })
}

/// Render a request and encode it to JSON text
///
/// # Errors
///
/// Returns `Error::MissingMethod` if the request has no method.
#[tracing::instrument(level = "trace", skip(req), fields(method = req.method().unwrap_or_default()))]
pub fn encode_request(req: &JsonRpcRequest) -> Result<String> {
    let encoded = req.to_wire().and_then(|wire| encode(&wire));
    record("request", encoded)
}

/// Render a response and encode it to JSON text
#[tracing::instrument(level = "trace", skip(resp), fields(has_error = resp.has_error()))]
pub fn encode_response(resp: &JsonRpcResponse) -> Result<String> {
    record("response", encode(&resp.to_wire()))
}

/// Decode and validate a request from JSON text
pub fn decode_request(data: &str) -> Result<JsonRpcRequest> {
    let decoded = decode_wire(data).and_then(|wire| JsonRpcRequest::from_wire(&wire));
    if let Err(e) = &decoded {
        codec_metrics().record_rejected("request", e.kind());
    }
    decoded
}

/// Decode and validate a response from JSON text
pub fn decode_response(data: &str) -> Result<JsonRpcResponse> {
    let decoded = decode_wire(data).and_then(|wire| JsonRpcResponse::from_wire(&wire));
    if let Err(e) = &decoded {
        codec_metrics().record_rejected("response", e.kind());
    }
    decoded
}

fn record(message: &'static str, encoded: Result<String>) -> Result<String> {
    match &encoded {
        Ok(_) => codec_metrics().record_encoded(message),
        Err(e) => {
            tracing::debug!(kind = message, error = %e, "failed to encode message");
            codec_metrics().record_rejected(message, e.kind());
        }
    }
    encoded
}
