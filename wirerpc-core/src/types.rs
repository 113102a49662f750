//! JSON-RPC 2.0 message types
//!
//! This module implements the two message types of the protocol and their
//! mapping to and from wire form:
//!
//! 1. **Request** (`JsonRpcRequest`): an outbound call, or a notification when
//!    it carries no id
//! 2. **Response** (`JsonRpcResponse`): the outcome of a call, either a
//!    result or an error object
//!
//! # Wire Form
//!
//! Messages are rendered to and parsed from a [`WireMap`], a generic JSON
//! object. Turning that map into text (and back) belongs to the transport;
//! the [`codec`](crate::codec) module offers thin helpers for it.
//!
//! ```text
//! {"jsonrpc":"2.0","method":"sum","params":[1,2],"id":1}
//! {"jsonrpc":"2.0","result":3,"id":1}
//! {"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"},"id":null}
//! ```
//!
//! # Blank Values
//!
//! Inbound validation treats a member as missing when it is absent or blank:
//! `null`, `false`, numeric zero, `""`, `"0"`, `[]` or `{}`. A response whose
//! `result` is `false` is therefore rejected with "missing result", and an id
//! of `0` with "missing id". Peers built against this library rely on that
//! behavior, so it is kept as is.

use crate::error::{Error, JsonRpcErrorData, RequestViolation, ResponseViolation, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Protocol version literal, always emitted and the only one accepted
pub const VERSION: &str = "2.0";

/// Generic key/value wire mapping handed to and received from a transport
pub type WireMap = Map<String, Value>;

/// Whether a wire member counts as missing
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(members)) => members.is_empty(),
    }
}

/// Coerce an arbitrary value to an integer request id
///
/// Integers are kept, floats are truncated, booleans become 0 or 1 and
/// strings contribute their leading integer (`"12abc"` is 12). Anything else
/// becomes 0, which renders as a notification.
pub fn coerce_id(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => leading_integer(s),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = value
            .saturating_mul(10)
            .saturating_add(if negative { -digit } else { digit });
    }
    value
}

fn is_blank_method(method: &str) -> bool {
    method.is_empty() || method == "0"
}

fn check_version(wire: &WireMap) -> std::result::Result<(), VersionProblem> {
    let version = wire.get("jsonrpc");
    if is_blank(version) {
        return Err(VersionProblem::Missing);
    }
    match version {
        Some(Value::String(v)) if v == VERSION => Ok(()),
        _ => Err(VersionProblem::Invalid),
    }
}

enum VersionProblem {
    Missing,
    Invalid,
}

/// Response correlation identifier
///
/// The protocol allows string and number ids. A null id is not a value of
/// this type: it is what a response renders when it has no id at all and its
/// error precedes id detection (see [`JsonRpcResponse::to_wire`]).
///
/// # Examples
///
/// ```rust
/// use wirerpc_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier
    Number(i64),
    /// Integer identifier above `i64::MAX`
    Unsigned(u64),
    /// String identifier
    String(String),
}

impl Id {
    /// Whether this id counts as "no id" on the wire (`0`, `""` or `"0"`)
    pub fn is_blank(&self) -> bool {
        match self {
            Id::Number(n) => *n == 0,
            Id::Unsigned(n) => *n == 0,
            Id::String(s) => s.is_empty() || s == "0",
        }
    }

    /// Read an id from a non-blank wire value
    fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Id::Number)
                .or_else(|| n.as_u64().map(Id::Unsigned)),
            Value::String(s) => Some(Id::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Unsigned(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Id::Unsigned(n), Id::Number)
    }
}

impl From<i32> for Id {
    fn from(n: i32) -> Self {
        Id::Number(i64::from(n))
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::Number(n) => Value::from(n),
            Id::Unsigned(n) => Value::from(n),
            Id::String(s) => Value::String(s),
        }
    }
}

/// Call arguments: positional or named
///
/// ```rust
/// use wirerpc_core::Params;
/// use serde_json::json;
///
/// let positional: Params = vec![json!(42), json!(23)].into();
/// assert!(!positional.is_empty());
///
/// let named = Params::from(json!({"minuend": 42}).as_object().cloned().unwrap());
/// assert_eq!(named.into_value(), json!({"minuend": 42}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// Ordered arguments, rendered as a JSON array
    Array(Vec<Value>),
    /// Keyed arguments, rendered as a JSON object
    Object(Map<String, Value>),
}

impl Params {
    pub fn is_empty(&self) -> bool {
        match self {
            Params::Array(items) => items.is_empty(),
            Params::Object(members) => members.is_empty(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Params::Array(items) => Value::Array(items),
            Params::Object(members) => Value::Object(members),
        }
    }

    /// Accept a wire value if it is an array or an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Params::Array(items)),
            Value::Object(members) => Some(Params::Object(members)),
            _ => None,
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(items: Vec<Value>) -> Self {
        Params::Array(items)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(members: Map<String, Value>) -> Self {
        Params::Object(members)
    }
}

/// JSON-RPC 2.0 request
///
/// Built with consuming `with_*` methods and rendered with
/// [`to_wire`](JsonRpcRequest::to_wire). A request without an id is a
/// notification: no response is expected.
///
/// # Id Zero
///
/// The id is kept as `Option<i64>`, but `Some(0)` renders exactly like
/// `None`: the `id` member is omitted and the message becomes a
/// notification. Callers that need a response must use a non-zero id.
///
/// # Examples
///
/// ```rust
/// use wirerpc_core::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new()
///     .with_method("subtract")
///     .with_params(vec![json!(42), json!(23)])
///     .with_id(1);
///
/// assert_eq!(
///     serde_json::Value::Object(request.to_wire().unwrap()),
///     json!({"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1})
/// );
///
/// // Rendering without a method is a construction error
/// assert!(JsonRpcRequest::new().to_wire().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRpcRequest {
    method: Option<String>,
    params: Option<Params>,
    id: Option<i64>,
}

impl JsonRpcRequest {
    /// Create an empty request; a method must be set before rendering
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a request that expects a response
    pub fn call(method: impl Into<String>, id: i64) -> Self {
        Self::new().with_method(method).with_id(id)
    }

    /// Shortcut for a request without an id
    pub fn notification(method: impl Into<String>) -> Self {
        Self::new().with_method(method)
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_params(mut self, params: impl Into<Params>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the id from a dynamic value, coercing it with [`coerce_id`]
    ///
    /// A non-numeric value becomes `0` and the request renders as a
    /// notification.
    pub fn with_id_value(self, id: &Value) -> Self {
        self.with_id(coerce_id(id))
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// True when the rendered message carries no id
    pub fn is_notification(&self) -> bool {
        matches!(self.id, None | Some(0))
    }

    /// Render the wire form `{jsonrpc, method, [params], [id]}`
    ///
    /// `params` is omitted when unset or empty, `id` when unset or zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingMethod` when no method is set or the method is
    /// blank (`""` or `"0"`).
    pub fn to_wire(&self) -> Result<WireMap> {
        let method = self
            .method
            .as_deref()
            .filter(|m| !is_blank_method(m))
            .ok_or(Error::MissingMethod)?;

        let mut wire = Map::new();
        wire.insert("jsonrpc".to_string(), Value::from(VERSION));
        wire.insert("method".to_string(), Value::from(method));

        if let Some(params) = self.params.as_ref().filter(|p| !p.is_empty()) {
            wire.insert("params".to_string(), params.clone().into_value());
        }

        if let Some(id) = self.id.filter(|id| *id != 0) {
            wire.insert("id".to_string(), Value::from(id));
        }

        Ok(wire)
    }

    /// Parse and validate an inbound request mapping
    ///
    /// Checks run in order: protocol version present, protocol version equal
    /// to `"2.0"`, non-blank string method, array or object params. A `null`
    /// params member is treated as absent. The id goes through
    /// [`coerce_id`], so string and numeric ids both land as integers.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` naming the first violation.
    pub fn from_wire(wire: &WireMap) -> Result<Self> {
        let reject = |violation: RequestViolation| {
            tracing::debug!(reason = %violation, "rejected inbound request");
            Error::InvalidRequest(violation)
        };

        check_version(wire).map_err(|problem| match problem {
            VersionProblem::Missing => reject(RequestViolation::MissingVersion),
            VersionProblem::Invalid => reject(RequestViolation::InvalidVersion),
        })?;

        let method = match wire.get("method") {
            Some(Value::String(method)) if !is_blank_method(method) => method.clone(),
            _ => return Err(reject(RequestViolation::MissingMethod)),
        };

        let params = match wire.get("params") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                Params::from_value(value.clone())
                    .ok_or_else(|| reject(RequestViolation::InvalidParams))?,
            ),
        };

        let id = wire.get("id").filter(|id| !id.is_null()).map(coerce_id);

        Ok(Self {
            method: Some(method),
            params,
            id,
        })
    }
}

impl Serialize for JsonRpcRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// What a response carries: a result or an error object, never both
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The call succeeded with this payload
    Success(Value),
    /// The call failed with this error object
    Failure(JsonRpcErrorData),
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Success(Value::Null)
    }
}

/// JSON-RPC 2.0 response
///
/// A response holds exactly one [`Outcome`]. Setting an error replaces the
/// result and vice versa. A freshly created response is a success with a
/// `null` result and no id.
///
/// # Null Ids
///
/// A parse error or invalid request may be detected before the request id is
/// known. When such a response has no id, [`to_wire`](Self::to_wire) emits
/// `"id": null` as the protocol requires. For every other outcome a missing
/// id is simply left out.
///
/// # Examples
///
/// ```rust
/// use wirerpc_core::{JsonRpcErrorData, JsonRpcResponse};
/// use serde_json::json;
///
/// let success = JsonRpcResponse::success(json!("result 1"), 1);
/// assert_eq!(
///     serde_json::Value::Object(success.to_wire()),
///     json!({"jsonrpc": "2.0", "result": "result 1", "id": 1})
/// );
///
/// let parse_failure = JsonRpcResponse::new().with_error(JsonRpcErrorData::parse_error());
/// assert_eq!(
///     serde_json::Value::Object(parse_failure.to_wire()),
///     json!({"jsonrpc": "2.0", "error": {"code": -32700, "message": "Parse error"}, "id": null})
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRpcResponse {
    outcome: Outcome,
    id: Option<Id>,
}

impl JsonRpcResponse {
    /// Create an empty response (null result, no id)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a successful response
    pub fn success(result: Value, id: impl Into<Id>) -> Self {
        Self {
            outcome: Outcome::Success(result),
            id: Some(id.into()),
        }
    }

    /// Create an error response
    pub fn failure(error: JsonRpcErrorData, id: impl Into<Id>) -> Self {
        Self {
            outcome: Outcome::Failure(error),
            id: Some(id.into()),
        }
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.outcome = Outcome::Success(result);
        self
    }

    pub fn with_error(mut self, error: JsonRpcErrorData) -> Self {
        self.outcome = Outcome::Failure(error);
        self
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The success payload, if this is not an error response
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success(result) => Some(result),
            Outcome::Failure(_) => None,
        }
    }

    /// The error object, if this is an error response
    pub fn error(&self) -> Option<&JsonRpcErrorData> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn has_error(&self) -> bool {
        matches!(self.outcome, Outcome::Failure(_))
    }

    pub fn is_success(&self) -> bool {
        !self.has_error()
    }

    /// Turn the response into the call's return value
    ///
    /// # Errors
    ///
    /// An error response yields `Error::JsonRpc` with the peer's error object.
    pub fn into_result(self) -> Result<Value> {
        match self.outcome {
            Outcome::Success(result) => Ok(result),
            Outcome::Failure(error) => Err(Error::JsonRpc(error)),
        }
    }

    /// Parse and validate an inbound response mapping
    ///
    /// The `error` member, when present, is parsed with
    /// [`JsonRpcErrorData::from_wire`]. See [`from_wire_with`](Self::from_wire_with)
    /// for the validation order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResponse` naming the first violation, or the
    /// error produced while parsing the error object.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wirerpc_core::{Id, JsonRpcResponse};
    /// use serde_json::json;
    ///
    /// let wire = json!({"jsonrpc": "2.0", "id": 5, "result": ["Hello world"]});
    /// let response = JsonRpcResponse::from_wire(wire.as_object().unwrap()).unwrap();
    ///
    /// assert_eq!(response.result(), Some(&json!(["Hello world"])));
    /// assert_eq!(response.id(), Some(&Id::Number(5)));
    /// ```
    pub fn from_wire(wire: &WireMap) -> Result<Self> {
        Self::from_wire_with(wire, JsonRpcErrorData::from_wire)
    }

    /// Parse an inbound response mapping with a caller-supplied error parser
    ///
    /// `parse_error` receives the raw, non-blank `error` member and decides
    /// how it becomes a [`JsonRpcErrorData`].
    ///
    /// Checks run in this order and stop at the first failure:
    ///
    /// 1. `jsonrpc` blank: missing protocol version
    /// 2. `jsonrpc` not `"2.0"`: invalid protocol version
    /// 3. `error` non-blank: parsed and attached; otherwise a blank `result`
    ///    is a missing result
    /// 4. `id` blank: missing id; an id that is neither integer nor string
    ///    is an invalid id
    pub fn from_wire_with<F>(wire: &WireMap, parse_error: F) -> Result<Self>
    where
        F: FnOnce(&Value) -> Result<JsonRpcErrorData>,
    {
        let reject = |violation: ResponseViolation| {
            tracing::debug!(reason = %violation, "rejected inbound response");
            Error::InvalidResponse(violation)
        };

        check_version(wire).map_err(|problem| match problem {
            VersionProblem::Missing => reject(ResponseViolation::MissingVersion),
            VersionProblem::Invalid => reject(ResponseViolation::InvalidVersion),
        })?;

        let outcome = match wire.get("error") {
            Some(error) if !is_blank(Some(error)) => Outcome::Failure(parse_error(error)?),
            _ => match wire.get("result") {
                Some(result) if !is_blank(Some(result)) => Outcome::Success(result.clone()),
                _ => return Err(reject(ResponseViolation::MissingResult)),
            },
        };

        let id = match wire.get("id") {
            Some(id) if !is_blank(Some(id)) => {
                Id::from_wire(id).ok_or_else(|| reject(ResponseViolation::InvalidId))?
            }
            _ => return Err(reject(ResponseViolation::MissingId)),
        };

        Ok(Self {
            outcome,
            id: Some(id),
        })
    }

    /// Render the wire form
    ///
    /// - `jsonrpc` is always `"2.0"`
    /// - an error response carries `error`; if it has no id and the code is
    ///   a parse error or invalid request, `id` is rendered as `null`
    /// - a success response always carries `result`, even when it is null
    /// - a non-blank id is always rendered
    pub fn to_wire(&self) -> WireMap {
        let mut wire = Map::new();
        wire.insert("jsonrpc".to_string(), Value::from(VERSION));

        let id = self.id.as_ref().filter(|id| !id.is_blank());

        match &self.outcome {
            Outcome::Failure(error) => {
                wire.insert("error".to_string(), Value::Object(error.to_wire()));
                let precedes_id = error.error_code().is_some_and(|code| code.precedes_id());
                if id.is_none() && precedes_id {
                    wire.insert("id".to_string(), Value::Null);
                }
            }
            Outcome::Success(result) => {
                wire.insert("result".to_string(), result.clone());
            }
        }

        if let Some(id) = id {
            wire.insert("id".to_string(), Value::from(id.clone()));
        }

        wire
    }
}

impl Serialize for JsonRpcResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: Value) -> WireMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_id_display() {
        assert_eq!(Id::String("test".to_string()).to_string(), "\"test\"");
        assert_eq!(Id::Number(42).to_string(), "42");
        assert_eq!(Id::Unsigned(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn test_id_from_u64() {
        assert_eq!(Id::from(7u64), Id::Number(7));
        assert_eq!(Id::from(u64::MAX), Id::Unsigned(u64::MAX));
    }

    #[test]
    fn test_id_blank() {
        assert!(Id::Number(0).is_blank());
        assert!(Id::String(String::new()).is_blank());
        assert!(Id::String("0".into()).is_blank());
        assert!(!Id::Number(-1).is_blank());
        assert!(!Id::String("abc".into()).is_blank());
    }

    #[test]
    fn test_is_blank() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ] {
            assert!(is_blank(Some(&value)), "{} should be blank", value);
        }
        for value in [json!(true), json!(1), json!("a"), json!([0]), json!({"a": 0})] {
            assert!(!is_blank(Some(&value)), "{} should not be blank", value);
        }
        assert!(is_blank(None));
    }

    #[test]
    fn test_coerce_id() {
        assert_eq!(coerce_id(&json!(7)), 7);
        assert_eq!(coerce_id(&json!(-3)), -3);
        assert_eq!(coerce_id(&json!(7.9)), 7);
        assert_eq!(coerce_id(&json!(true)), 1);
        assert_eq!(coerce_id(&json!(false)), 0);
        assert_eq!(coerce_id(&json!("42")), 42);
        assert_eq!(coerce_id(&json!("  12abc")), 12);
        assert_eq!(coerce_id(&json!("-5")), -5);
        assert_eq!(coerce_id(&json!("abc")), 0);
        assert_eq!(coerce_id(&json!(null)), 0);
        assert_eq!(coerce_id(&json!([1])), 0);
        assert_eq!(coerce_id(&json!("99999999999999999999999")), i64::MAX);
    }

    #[test]
    fn test_request_minimal() {
        let request = JsonRpcRequest::new().with_method("ping");
        assert_eq!(
            Value::Object(request.to_wire().unwrap()),
            json!({"jsonrpc": "2.0", "method": "ping"})
        );
    }

    #[test]
    fn test_request_missing_method() {
        assert_eq!(JsonRpcRequest::new().to_wire(), Err(Error::MissingMethod));
        assert_eq!(
            JsonRpcRequest::new().with_method("").with_id(1).to_wire(),
            Err(Error::MissingMethod)
        );
    }

    #[test]
    fn test_request_zero_method_is_missing() {
        assert_eq!(
            JsonRpcRequest::call("0", 1).to_wire(),
            Err(Error::MissingMethod)
        );
        assert!(JsonRpcRequest::call("00", 1).to_wire().is_ok());
    }

    #[test]
    fn test_request_empty_params_omitted() {
        let request = JsonRpcRequest::new()
            .with_method("ping")
            .with_params(Vec::<Value>::new());
        let wire = request.to_wire().unwrap();
        assert!(!wire.contains_key("params"));

        let request = JsonRpcRequest::new().with_method("ping").with_params(Map::new());
        assert!(!request.to_wire().unwrap().contains_key("params"));
    }

    #[test]
    fn test_request_keyed_params() {
        let mut params = Map::new();
        params.insert("a".into(), json!(5));
        let request = JsonRpcRequest::call("add", 3).with_params(params);
        assert_eq!(
            Value::Object(request.to_wire().unwrap()),
            json!({"jsonrpc": "2.0", "method": "add", "params": {"a": 5}, "id": 3})
        );
    }

    #[test]
    fn test_request_zero_and_unset_id_omitted() {
        let unset = JsonRpcRequest::new().with_method("m");
        let zero = JsonRpcRequest::new().with_method("m").with_id(0);

        assert!(!unset.to_wire().unwrap().contains_key("id"));
        assert!(!zero.to_wire().unwrap().contains_key("id"));
        assert!(unset.is_notification());
        assert!(zero.is_notification());

        // The distinction survives in memory
        assert_eq!(unset.id(), None);
        assert_eq!(zero.id(), Some(0));
    }

    #[test]
    fn test_request_id_value_coerced_at_assignment() {
        let request = JsonRpcRequest::new()
            .with_method("m")
            .with_id_value(&json!("not a number"));
        assert_eq!(request.id(), Some(0));
        assert!(!request.to_wire().unwrap().contains_key("id"));

        let request = JsonRpcRequest::new().with_method("m").with_id_value(&json!("17"));
        assert_eq!(request.id(), Some(17));
        assert_eq!(request.to_wire().unwrap()["id"], json!(17));
    }

    #[test]
    fn test_request_serialize() {
        let request = JsonRpcRequest::call("test", 1);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"test\""));
        assert!(json.contains("\"id\":1"));

        assert!(serde_json::to_string(&JsonRpcRequest::new()).is_err());
    }

    #[test]
    fn test_request_from_wire() {
        let request = JsonRpcRequest::from_wire(&wire(
            json!({"jsonrpc": "2.0", "method": "sum", "params": [1, 2], "id": "4"}),
        ))
        .unwrap();

        assert_eq!(request.method(), Some("sum"));
        assert_eq!(request.params(), Some(&Params::Array(vec![json!(1), json!(2)])));
        assert_eq!(request.id(), Some(4));
    }

    #[test]
    fn test_request_from_wire_notification() {
        let request =
            JsonRpcRequest::from_wire(&wire(json!({"jsonrpc": "2.0", "method": "tick", "params": null})))
                .unwrap();
        assert!(request.is_notification());
        assert!(request.params().is_none());
    }

    #[test]
    fn test_request_from_wire_rejections() {
        let cases = [
            (json!({"method": "m"}), RequestViolation::MissingVersion),
            (json!({"jsonrpc": "1.0", "method": "m"}), RequestViolation::InvalidVersion),
            (json!({"jsonrpc": 2.0, "method": "m"}), RequestViolation::InvalidVersion),
            (json!({"jsonrpc": "2.0"}), RequestViolation::MissingMethod),
            (json!({"jsonrpc": "2.0", "method": ""}), RequestViolation::MissingMethod),
            (json!({"jsonrpc": "2.0", "method": "0"}), RequestViolation::MissingMethod),
            (json!({"jsonrpc": "2.0", "method": 3}), RequestViolation::MissingMethod),
            (json!({"jsonrpc": "2.0", "method": "m", "params": 3}), RequestViolation::InvalidParams),
        ];

        for (value, violation) in cases {
            assert_eq!(
                JsonRpcRequest::from_wire(&wire(value.clone())),
                Err(Error::InvalidRequest(violation)),
                "input: {}",
                value
            );
        }
    }

    #[test]
    fn test_response_fresh() {
        let response = JsonRpcResponse::new();
        assert!(!response.has_error());
        assert!(response.is_success());
        assert_eq!(response.result(), Some(&Value::Null));
        assert_eq!(response.id(), None);
    }

    #[test]
    fn test_response_error_replaces_result() {
        let response = JsonRpcResponse::new()
            .with_result(json!(["result"]))
            .with_error(JsonRpcErrorData::default())
            .with_id(4);

        assert!(response.has_error());
        assert_eq!(response.result(), None);
        assert_eq!(response.error(), Some(&JsonRpcErrorData::default()));
        assert_eq!(response.id(), Some(&Id::Number(4)));
    }

    #[test]
    fn test_response_to_wire_success() {
        let response = JsonRpcResponse::new().with_id(1).with_result(json!("result 1"));
        assert_eq!(
            Value::Object(response.to_wire()),
            json!({"jsonrpc": "2.0", "id": 1, "result": "result 1"})
        );
    }

    #[test]
    fn test_response_to_wire_keeps_empty_result() {
        let response = JsonRpcResponse::new().with_id("a").with_result(json!(false));
        assert_eq!(
            Value::Object(response.to_wire()),
            json!({"jsonrpc": "2.0", "id": "a", "result": false})
        );

        let response = JsonRpcResponse::new();
        assert_eq!(
            Value::Object(response.to_wire()),
            json!({"jsonrpc": "2.0", "result": null})
        );
    }

    #[test]
    fn test_response_to_wire_default_error() {
        let response = JsonRpcResponse::new()
            .with_id(1)
            .with_error(JsonRpcErrorData::default());
        assert_eq!(
            Value::Object(response.to_wire()),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "Server error"}
            })
        );
    }

    #[test]
    fn test_response_to_wire_null_id_for_parse_error() {
        let response = JsonRpcResponse::new().with_error(JsonRpcErrorData::parse_error());
        assert_eq!(
            Value::Object(response.to_wire()),
            json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {"code": -32700, "message": "Parse error"}
            })
        );
    }

    #[test]
    fn test_response_to_wire_null_id_for_invalid_request() {
        let response = JsonRpcResponse::new()
            .with_error(JsonRpcErrorData::invalid_request())
            .with_id(0);
        assert_eq!(response.to_wire().get("id"), Some(&Value::Null));
    }

    #[test]
    fn test_response_to_wire_no_null_id_for_other_errors() {
        let response = JsonRpcResponse::new().with_error(JsonRpcErrorData::method_not_found());
        assert!(!response.to_wire().contains_key("id"));
    }

    #[test]
    fn test_response_to_wire_id_wins_over_null() {
        let response = JsonRpcResponse::failure(JsonRpcErrorData::parse_error(), 9);
        assert_eq!(response.to_wire()["id"], json!(9));
    }

    #[test]
    fn test_response_from_wire_success() {
        let response =
            JsonRpcResponse::from_wire(&wire(json!({"jsonrpc": "2.0", "id": 5, "result": ["Hello world"]})))
                .unwrap();
        assert_eq!(response.result(), Some(&json!(["Hello world"])));
        assert_eq!(response.id(), Some(&Id::Number(5)));
        assert!(!response.has_error());
    }

    #[test]
    fn test_response_from_wire_string_id() {
        let response =
            JsonRpcResponse::from_wire(&wire(json!({"jsonrpc": "2.0", "id": "abc", "result": 1})))
                .unwrap();
        assert_eq!(response.id(), Some(&Id::String("abc".into())));
    }

    #[test]
    fn test_response_from_wire_id_above_i64() {
        let response = JsonRpcResponse::from_wire(&wire(
            json!({"jsonrpc": "2.0", "result": 1, "id": u64::MAX}),
        ))
        .unwrap();
        assert_eq!(response.id(), Some(&Id::Unsigned(u64::MAX)));
        assert_eq!(response.to_wire()["id"], json!(u64::MAX));
    }

    #[test]
    fn test_response_from_wire_error_object() {
        let response = JsonRpcResponse::from_wire(&wire(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "error": {"code": -32601, "message": "Method not found"}
        })))
        .unwrap();

        assert!(response.has_error());
        assert_eq!(response.error(), Some(&JsonRpcErrorData::method_not_found()));
        assert_eq!(response.result(), None);
    }

    #[test]
    fn test_response_from_wire_error_wins_over_result() {
        let response = JsonRpcResponse::from_wire(&wire(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": "ignored",
            "error": {"code": 1, "message": "m"}
        })))
        .unwrap();
        assert!(response.has_error());
    }

    #[test]
    fn test_response_from_wire_blank_error_falls_back_to_result() {
        let response = JsonRpcResponse::from_wire(&wire(
            json!({"jsonrpc": "2.0", "id": 3, "result": 1, "error": null}),
        ))
        .unwrap();
        assert_eq!(response.result(), Some(&json!(1)));
    }

    #[test]
    fn test_response_from_wire_bad_error_object() {
        let result = JsonRpcResponse::from_wire(&wire(
            json!({"jsonrpc": "2.0", "id": 3, "error": {"message": "m"}}),
        ));
        assert_eq!(
            result,
            Err(Error::InvalidErrorObject(crate::error::ErrorViolation::MissingCode))
        );
    }

    #[test]
    fn test_response_from_wire_rejections() {
        let cases = [
            (json!({"result": true, "id": 1}), ResponseViolation::MissingVersion),
            (json!({"jsonrpc": "", "result": true, "id": 1}), ResponseViolation::MissingVersion),
            (json!({"jsonrpc": "1", "result": true, "id": 1}), ResponseViolation::InvalidVersion),
            (json!({"jsonrpc": "2.0", "id": 1}), ResponseViolation::MissingResult),
            (json!({"jsonrpc": "2.0", "result": false, "id": 1}), ResponseViolation::MissingResult),
            (json!({"jsonrpc": "2.0", "result": true}), ResponseViolation::MissingId),
            (json!({"jsonrpc": "2.0", "result": true, "id": ""}), ResponseViolation::MissingId),
            (json!({"jsonrpc": "2.0", "result": true, "id": null}), ResponseViolation::MissingId),
            (json!({"jsonrpc": "2.0", "result": true, "id": 1.5}), ResponseViolation::InvalidId),
            (json!({"jsonrpc": "2.0", "result": true, "id": [1]}), ResponseViolation::InvalidId),
        ];

        for (value, violation) in cases {
            assert_eq!(
                JsonRpcResponse::from_wire(&wire(value.clone())),
                Err(Error::InvalidResponse(violation)),
                "input: {}",
                value
            );
        }
    }

    #[test]
    fn test_response_from_wire_with_injected_parser() {
        let injected = JsonRpcErrorData::new(123, "injected");
        let mut seen = None;

        let response = JsonRpcResponse::from_wire_with(
            &wire(json!({"jsonrpc": "2.0", "id": 5, "error": ["123"]})),
            |raw| {
                seen = Some(raw.clone());
                Ok(injected.clone())
            },
        )
        .unwrap();

        assert_eq!(seen, Some(json!(["123"])));
        assert_eq!(response, JsonRpcResponse::new().with_id(5).with_error(injected));
    }

    #[test]
    fn test_response_from_wire_with_parser_not_called_for_success() {
        let response = JsonRpcResponse::from_wire_with(
            &wire(json!({"jsonrpc": "2.0", "id": 5, "result": 1})),
            |_| panic!("error parser must not run"),
        )
        .unwrap();
        assert!(response.is_success());
    }

    #[test]
    fn test_response_into_result() {
        assert_eq!(
            JsonRpcResponse::success(json!(42), 1).into_result(),
            Ok(json!(42))
        );
        assert_eq!(
            JsonRpcResponse::failure(JsonRpcErrorData::internal_error(), 1).into_result(),
            Err(Error::JsonRpc(JsonRpcErrorData::internal_error()))
        );
    }

    #[test]
    fn test_response_serialize_matches_wire_form() {
        let response = JsonRpcResponse::new().with_error(JsonRpcErrorData::parse_error());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            Value::Object(response.to_wire())
        );
    }
}
