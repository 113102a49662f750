//! wirerpc - JSON-RPC 2.0 message objects
//!
//! Convenience crate that re-exports `wirerpc-core`. Depend on this crate if
//! you want the whole library under a single `wirerpc::` prefix.
//!
//! # Quick Start - Calling
//!
//! ```rust
//! use wirerpc::{JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::call("add", 1).with_params(vec![json!(5), json!(3)]);
//! let outbound = wirerpc::codec::encode_request(&request).unwrap();
//! assert!(outbound.contains("\"method\":\"add\""));
//!
//! // ... the transport sends `outbound` and hands back the reply text ...
//! let reply = r#"{"jsonrpc":"2.0","result":8,"id":1}"#;
//! let response: JsonRpcResponse = wirerpc::codec::decode_response(reply).unwrap();
//! assert_eq!(response.into_result().unwrap(), json!(8));
//! ```
//!
//! # Quick Start - Answering
//!
//! ```rust
//! use wirerpc::{JsonRpcErrorData, JsonRpcResponse};
//!
//! // The request text could not be parsed, so its id is unknown
//! let response = JsonRpcResponse::new().with_error(JsonRpcErrorData::parse_error());
//! let wire = response.to_wire();
//! assert!(wire["id"].is_null());
//! ```

pub use wirerpc_core as core;

pub use wirerpc_core::{
    codec, coerce_id, init_observability, metrics, shutdown_observability, Error, ErrorCode,
    Id, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse, ObservabilityConfig, Outcome,
    Params, Result, WireMap, VERSION,
};
