//! JSON-RPC 2.0 message objects for wirerpc
//!
//! This crate implements the data model of JSON-RPC 2.0 and the rules for
//! moving it to and from wire form:
//!
//! - **Types**: requests, responses and their ids and params
//! - **Error handling**: the crate error, the reserved error catalog and the
//!   wire error object
//! - **Codec**: JSON text helpers over the wire mappings
//! - **Observability**: `tracing` subscriber and OpenTelemetry setup, plus
//!   codec metrics
//!
//! # Architecture
//!
//! The crate is transport-agnostic. It renders outbound messages to a
//! [`WireMap`] and validates inbound mappings, but never opens a connection,
//! retries a call or dispatches to a handler. Batches are not supported.
//!
//! # Example
//!
//! ```rust
//! use wirerpc_core::{Error, JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! // Outbound call
//! let request = JsonRpcRequest::new()
//!     .with_method("add")
//!     .with_params(vec![json!(5), json!(3)])
//!     .with_id(1);
//! let wire = request.to_wire().unwrap();
//! assert_eq!(wire["jsonrpc"], "2.0");
//!
//! // Inbound answer
//! let answer = json!({"jsonrpc": "2.0", "result": 8, "id": 1});
//! let response = JsonRpcResponse::from_wire(answer.as_object().unwrap()).unwrap();
//! assert_eq!(response.into_result().unwrap(), json!(8));
//!
//! // Validation failures carry stable messages
//! let broken = json!({"jsonrpc": "2.0", "result": true});
//! let err = JsonRpcResponse::from_wire(broken.as_object().unwrap()).unwrap_err();
//! assert_eq!(err.to_string(), "Response is not valid JsonRPC response: missing id");
//! assert!(matches!(err, Error::InvalidResponse(_)));
//! ```

pub mod codec;
pub mod error;
pub mod metrics;
pub mod observability;
pub mod types;

pub use error::{
    Error, ErrorCode, ErrorViolation, JsonRpcErrorData, RequestViolation, ResponseViolation,
    Result,
};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{
    coerce_id, Id, JsonRpcRequest, JsonRpcResponse, Outcome, Params, WireMap, VERSION,
};
