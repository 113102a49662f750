//! Error types for wirerpc
//!
//! This module holds both sides of error handling in the library:
//!
//! - **Error**: the crate error returned by every fallible operation (uses thiserror)
//! - **JsonRpcErrorData**: the wire-format error object carried inside a response
//! - **ErrorCode**: the catalog of reserved JSON-RPC 2.0 error codes
//!
//! # Error Kinds
//!
//! `Error` separates two kinds of failure:
//!
//! - **Construction errors** are programmer mistakes made while building an
//!   outbound message (a request without a method, an application error code
//!   without a message). They must be fixed by the caller.
//! - **Protocol errors** mean an inbound mapping is not a valid JSON-RPC 2.0
//!   message. They are not retriable at this layer; the transport decides
//!   whether to retry the underlying call.
//!
//! The `Display` output of every variant is a stable, user-visible string.
//!
//! # Reserved Error Codes
//!
//! | Code   | Meaning          | Default message    |
//! |--------|------------------|--------------------|
//! | -32700 | Parse error      | "Parse error"      |
//! | -32600 | Invalid request  | "Invalid request"  |
//! | -32601 | Method not found | "Method not found" |
//! | -32602 | Invalid params   | "Invalid params"   |
//! | -32603 | Internal error   | "Internal error"   |
//! | -32000 | Server error     | "Server error"     |
//!
//! # Examples
//!
//! ```rust
//! use wirerpc_core::{ErrorCode, JsonRpcErrorData};
//!
//! let error = JsonRpcErrorData::from_code(-32601).unwrap();
//! assert_eq!(error.message(), "Method not found");
//! assert_eq!(error.error_code(), Some(ErrorCode::MethodNotFound));
//!
//! // Application codes carry their own message
//! assert!(JsonRpcErrorData::from_code(42).is_err());
//! let custom = JsonRpcErrorData::new(42, "Quota exhausted");
//! assert_eq!(custom.code(), 42);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Parse error code (-32700)
pub const PARSE_ERROR: i32 = -32700;
/// Invalid request code (-32600)
pub const INVALID_REQUEST: i32 = -32600;
/// Method not found code (-32601)
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid params code (-32602)
pub const INVALID_PARAMS: i32 = -32602;
/// Internal error code (-32603)
pub const INTERNAL_ERROR: i32 = -32603;
/// Generic server error code (-32000)
pub const SERVER_ERROR: i32 = -32000;

/// Result type for wirerpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for wirerpc operations
///
/// # Categories
///
/// - **Construction**: `MissingMethod`, `MissingErrorMessage`
/// - **Protocol**: `InvalidResponse`, `InvalidRequest`, `InvalidErrorObject`
/// - **Remote**: `JsonRpc` (an error object returned by the peer)
/// - **Text encoding**: `Serialization`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A request was rendered without a method name
    #[error("Method must be provided for request")]
    MissingMethod,

    /// An error object was built from an application code with no message
    ///
    /// Only reserved codes have a catalog message to fall back on.
    #[error("Error code {0} is not reserved and requires a message")]
    MissingErrorMessage(i32),

    /// An inbound mapping is not a valid JSON-RPC 2.0 response
    #[error("Response is not valid JsonRPC response: {0}")]
    InvalidResponse(ResponseViolation),

    /// An inbound mapping is not a valid JSON-RPC 2.0 request
    #[error("Request is not valid JsonRPC request: {0}")]
    InvalidRequest(RequestViolation),

    /// An inbound `error` member is not a valid JSON-RPC 2.0 error object
    #[error("Error is not valid JsonRPC error: {0}")]
    InvalidErrorObject(ErrorViolation),

    /// The peer answered with an error object
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// JSON text could not be produced or parsed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error means inbound data does not conform to JSON-RPC 2.0
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidResponse(_) | Error::InvalidRequest(_) | Error::InvalidErrorObject(_)
        )
    }

    /// Short, stable label used as a metric attribute
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Error::MissingMethod => "missing_method",
            Error::MissingErrorMessage(_) => "missing_error_message",
            Error::InvalidResponse(_) => "invalid_response",
            Error::InvalidRequest(_) => "invalid_request",
            Error::InvalidErrorObject(_) => "invalid_error_object",
            Error::JsonRpc(_) => "json_rpc",
            Error::Serialization(_) => "serialization",
        }
    }
}

/// Reason an inbound response mapping was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseViolation {
    /// `jsonrpc` is absent or blank
    MissingVersion,
    /// `jsonrpc` is present but not `"2.0"`
    InvalidVersion,
    /// Neither a non-blank `error` nor a non-blank `result` is present
    MissingResult,
    /// `id` is absent or blank
    MissingId,
    /// `id` is neither an integer nor a string
    InvalidId,
}

impl ResponseViolation {
    /// The stable description appended to the error prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseViolation::MissingVersion => "missing protocol version",
            ResponseViolation::InvalidVersion => "invalid protocol version",
            ResponseViolation::MissingResult => "missing result",
            ResponseViolation::MissingId => "missing id",
            ResponseViolation::InvalidId => "invalid id",
        }
    }
}

impl fmt::Display for ResponseViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason an inbound request mapping was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestViolation {
    /// `jsonrpc` is absent or blank
    MissingVersion,
    /// `jsonrpc` is present but not `"2.0"`
    InvalidVersion,
    /// `method` is absent, empty or not a string
    MissingMethod,
    /// `params` is neither an array nor an object
    InvalidParams,
}

impl RequestViolation {
    /// The stable description appended to the error prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestViolation::MissingVersion => "missing protocol version",
            RequestViolation::InvalidVersion => "invalid protocol version",
            RequestViolation::MissingMethod => "missing method",
            RequestViolation::InvalidParams => "invalid params",
        }
    }
}

impl fmt::Display for RequestViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason an inbound error object was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorViolation {
    /// The `error` member is not a JSON object
    NotAnObject,
    /// `code` is absent or null
    MissingCode,
    /// `code` is not an integer in the `i32` range
    InvalidCode,
    /// `message` is absent or null
    MissingMessage,
    /// `message` is not a string
    InvalidMessage,
}

impl ErrorViolation {
    /// The stable description appended to the error prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorViolation::NotAnObject => "not an object",
            ErrorViolation::MissingCode => "missing code",
            ErrorViolation::InvalidCode => "invalid code",
            ErrorViolation::MissingMessage => "missing message",
            ErrorViolation::InvalidMessage => "invalid message",
        }
    }
}

impl fmt::Display for ErrorViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog of reserved JSON-RPC 2.0 error codes
///
/// Each reserved code has a fixed default message. The pairs must not change:
/// peers compare against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid JSON was received (-32700)
    ParseError,
    /// The JSON is not a valid request object (-32600)
    InvalidRequest,
    /// The method does not exist or is not available (-32601)
    MethodNotFound,
    /// Invalid method parameters (-32602)
    InvalidParams,
    /// Internal JSON-RPC error (-32603)
    InternalError,
    /// Generic implementation-defined server error (-32000)
    ServerError,
}

impl ErrorCode {
    /// Every reserved code, in catalog order
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
        ErrorCode::ServerError,
    ];

    /// Numeric wire code
    pub const fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => PARSE_ERROR,
            ErrorCode::InvalidRequest => INVALID_REQUEST,
            ErrorCode::MethodNotFound => METHOD_NOT_FOUND,
            ErrorCode::InvalidParams => INVALID_PARAMS,
            ErrorCode::InternalError => INTERNAL_ERROR,
            ErrorCode::ServerError => SERVER_ERROR,
        }
    }

    /// Catalog message used when no explicit message is given
    pub const fn default_message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ServerError => "Server error",
        }
    }

    /// Look up a numeric code in the catalog
    ///
    /// Returns `None` for application-defined codes.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Whether a response carrying this error may have been produced before
    /// the request id could be read
    ///
    /// Responses for these codes are rendered with `"id": null` when no id
    /// is known.
    pub const fn precedes_id(self) -> bool {
        matches!(self, ErrorCode::ParseError | ErrorCode::InvalidRequest)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.default_message(), self.code())
    }
}

/// JSON-RPC 2.0 error object
///
/// This is the exact wire structure found in the `error` member of a
/// response:
///
/// - `code`: integer error code
/// - `message`: short description of the error
/// - `data`: optional additional information, omitted when absent
///
/// # Construction
///
/// - `default()` is the generic server error (-32000, "Server error")
/// - `from_code()` resolves a reserved code to its catalog message and
///   refuses application codes, which need an explicit message
/// - `new()` / `with_data()` take any code and message
///
/// # Examples
///
/// ```rust
/// use wirerpc_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let error = JsonRpcErrorData::default();
/// assert_eq!(error.code(), -32000);
/// assert_eq!(error.message(), "Server error");
///
/// let detailed = JsonRpcErrorData::with_data(
///     1001,
///     "Insufficient funds",
///     json!({"balance": 50, "required": 100}),
/// );
/// assert_eq!(
///     serde_json::Value::Object(detailed.to_wire()),
///     json!({
///         "code": 1001,
///         "message": "Insufficient funds",
///         "data": {"balance": 50, "required": 100}
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcErrorData {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Create an error object with an explicit code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error object carrying additional `data`
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create an error object for a code, using the catalog message
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingErrorMessage` when `code` is not one of the
    /// reserved codes; use [`JsonRpcErrorData::new`] for those.
    pub fn from_code(code: i32) -> Result<Self> {
        ErrorCode::from_code(code)
            .map(Self::from)
            .ok_or(Error::MissingErrorMessage(code))
    }

    /// Parse error (-32700)
    pub fn parse_error() -> Self {
        ErrorCode::ParseError.into()
    }

    /// Invalid request (-32600)
    pub fn invalid_request() -> Self {
        ErrorCode::InvalidRequest.into()
    }

    /// Method not found (-32601)
    pub fn method_not_found() -> Self {
        ErrorCode::MethodNotFound.into()
    }

    /// Invalid params (-32602)
    pub fn invalid_params() -> Self {
        ErrorCode::InvalidParams.into()
    }

    /// Internal error (-32603)
    pub fn internal_error() -> Self {
        ErrorCode::InternalError.into()
    }

    /// Generic server error (-32000)
    pub fn server_error() -> Self {
        ErrorCode::ServerError.into()
    }

    /// Attach or replace the `data` member
    pub fn set_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Replace the message
    pub fn set_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The catalog entry for this code, if it is reserved
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }

    /// Build an error object from its wire form
    ///
    /// The value must be an object with an integer `code` that fits in `i32`
    /// and a string `message`. `data` is optional and taken as-is; an
    /// explicit `null` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidErrorObject` describing the first problem found.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let reject = |violation: ErrorViolation| {
            tracing::debug!(reason = %violation, "rejected inbound error object");
            Error::InvalidErrorObject(violation)
        };

        let object = value
            .as_object()
            .ok_or_else(|| reject(ErrorViolation::NotAnObject))?;

        let code = match object.get("code") {
            None | Some(Value::Null) => return Err(reject(ErrorViolation::MissingCode)),
            Some(code) => code
                .as_i64()
                .and_then(|c| i32::try_from(c).ok())
                .ok_or_else(|| reject(ErrorViolation::InvalidCode))?,
        };

        let message = match object.get("message") {
            None | Some(Value::Null) => return Err(reject(ErrorViolation::MissingMessage)),
            Some(Value::String(message)) => message.clone(),
            Some(_) => return Err(reject(ErrorViolation::InvalidMessage)),
        };

        let data = object.get("data").filter(|d| !d.is_null()).cloned();

        Ok(Self {
            code,
            message,
            data,
        })
    }

    /// Render the wire form `{code, message, [data]}`
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut wire = Map::new();
        wire.insert("code".to_string(), Value::from(self.code));
        wire.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(data) = &self.data {
            wire.insert("data".to_string(), data.clone());
        }
        wire
    }
}

impl Default for JsonRpcErrorData {
    /// The generic server error (-32000, "Server error")
    fn default() -> Self {
        Self::server_error()
    }
}

impl From<ErrorCode> for JsonRpcErrorData {
    fn from(code: ErrorCode) -> Self {
        Self::new(code.code(), code.default_message())
    }
}

impl fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message", e.g. "[-32601] Method not found"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
