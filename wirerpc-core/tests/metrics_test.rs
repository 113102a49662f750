//! Codec counters as seen by an exporter on the global meter provider

use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
use opentelemetry_sdk::metrics::{InMemoryMetricExporter, PeriodicReader, SdkMeterProvider};
use wirerpc_core::{codec, JsonRpcRequest, JsonRpcResponse};

fn counter_value(exporter: &InMemoryMetricExporter, name: &str, attributes: &[KeyValue]) -> u64 {
    let exported = exporter.get_finished_metrics().unwrap();
    let latest = exported.last().expect("nothing exported");

    let mut wanted = attributes.to_vec();
    wanted.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));

    latest
        .scope_metrics()
        .flat_map(|scope| scope.metrics())
        .filter(|metric| metric.name() == name)
        .filter_map(|metric| match metric.data() {
            AggregatedMetrics::U64(MetricData::Sum(sum)) => Some(sum),
            _ => None,
        })
        .flat_map(|sum| sum.data_points())
        .filter(|point| {
            let mut found: Vec<KeyValue> = point.attributes().cloned().collect();
            found.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
            found == wanted
        })
        .map(|point| point.value())
        .sum()
}

// A single test: the codec counters bind to the global provider once per process
#[test]
fn test_codec_records_encoded_and_rejected() {
    let exporter = InMemoryMetricExporter::default();
    let reader = PeriodicReader::builder(exporter.clone()).build();
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    global::set_meter_provider(provider.clone());

    codec::encode_request(&JsonRpcRequest::call("sum", 1)).unwrap();
    codec::encode_response(&JsonRpcResponse::success(serde_json::json!(3), 1)).unwrap();
    codec::encode_request(&JsonRpcRequest::new()).unwrap_err();
    codec::decode_response(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
    codec::decode_request("not json").unwrap_err();
    codec::decode_response(r#"{"jsonrpc":"2.0","result":3,"id":1}"#).unwrap();

    provider.force_flush().unwrap();

    let encoded = "wirerpc.messages.encoded";
    assert_eq!(counter_value(&exporter, encoded, &[KeyValue::new("message", "request")]), 1);
    assert_eq!(counter_value(&exporter, encoded, &[KeyValue::new("message", "response")]), 1);

    let rejected = "wirerpc.messages.rejected";
    let rejections = [
        ("request", "missing_method", 1),
        ("response", "invalid_response", 1),
        ("request", "serialization", 1),
        ("response", "serialization", 0),
    ];
    for (message, error_type, expected) in rejections {
        let attributes = [
            KeyValue::new("message", message),
            KeyValue::new("error_type", error_type),
        ];
        assert_eq!(
            counter_value(&exporter, rejected, &attributes),
            expected,
            "{message}/{error_type}"
        );
    }

    provider.shutdown().unwrap();
}
