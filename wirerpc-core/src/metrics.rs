//! Codec metrics definitions
//!
//! OpenTelemetry counters recorded by the [`codec`](crate::codec) helpers.
//!
//! # Metrics Collected
//!
//! - **wirerpc.messages.encoded**: messages rendered to JSON text (counter)
//! - **wirerpc.messages.rejected**: messages that failed validation or
//!   encoding (counter)
//!
//! Both carry a `message` attribute (`request` or `response`); rejections also
//! carry `error_type`.
//!
//! Instruments bind to the meter provider installed when they are first used.
//! Call [`init_observability`](crate::init_observability) before encoding or
//! decoding anything if the counters should be exported.

use opentelemetry::{
    global,
    metrics::{Counter, Meter},
    KeyValue,
};
use std::sync::OnceLock;

/// Counters for codec activity
pub struct CodecMetrics {
    /// Total number of messages encoded
    pub encoded_total: Counter<u64>,
    /// Total number of messages rejected
    pub rejected_total: Counter<u64>,
}

impl CodecMetrics {
    /// Create counters on the global meter provider
    pub fn new() -> Self {
        Self::new_with_meter(&global::meter("wirerpc"))
    }

    /// Create counters on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            encoded_total: meter
                .u64_counter("wirerpc.messages.encoded")
                .with_description("Total number of JSON-RPC messages encoded")
                .build(),
            rejected_total: meter
                .u64_counter("wirerpc.messages.rejected")
                .with_description("Total number of JSON-RPC messages rejected")
                .build(),
        }
    }

    /// Record an encoded message
    pub fn record_encoded(&self, message: &'static str) {
        self.encoded_total
            .add(1, &[KeyValue::new("message", message)]);
    }

    /// Record a rejected message
    pub fn record_rejected(&self, message: &'static str, error_type: &'static str) {
        self.rejected_total.add(
            1,
            &[
                KeyValue::new("message", message),
                KeyValue::new("error_type", error_type),
            ],
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide codec metrics
pub fn codec_metrics() -> &'static CodecMetrics {
    static METRICS: OnceLock<CodecMetrics> = OnceLock::new();
    METRICS.get_or_init(CodecMetrics::new)
}
