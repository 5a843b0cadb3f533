//! Delivery stream transform that tags API access log entries with the
//! name and description of the API key that made the request.

use crate::{
    error::HandlerError,
    keys::{KeyDirectory, KeyMetadata},
};
use aws_lambda_events::{
    encodings::Base64Data,
    firehose::{
        KinesisFirehoseEvent, KinesisFirehoseResponse, KinesisFirehoseResponseRecord,
        KinesisFirehoseResponseRecordMetadata,
    },
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const API_KEY_ID: &str = "identity.apiKeyId";
pub const API_KEY_NAME: &str = "identity.apiKeyName";
pub const API_KEY_DESCRIPTION: &str = "identity.apiKeyDescription";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub record_id: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub record_id: String,
    pub data: Vec<u8>,
    pub partition_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordResult {
    Ok,
    Dropped,
    ProcessingFailed,
}

impl RecordResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordResult::Ok => "Ok",
            RecordResult::Dropped => "Dropped",
            RecordResult::ProcessingFailed => "ProcessingFailed",
        }
    }
}

/// One API Gateway access log line. Fields beyond the ones named here are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    #[serde(rename = "requestId", default)]
    pub request_id: String,
    #[serde(rename = "apiId", default)]
    pub api_id: String,
    #[serde(rename = "identity.apiKeyId", default)]
    pub api_key_id: String,
    #[serde(default)]
    pub stage: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct EnrichedEntry {
    #[serde(flatten)]
    entry: AccessLogEntry,
    #[serde(rename = "identity.apiKeyName")]
    api_key_name: String,
    #[serde(rename = "identity.apiKeyDescription")]
    api_key_description: String,
}

impl EnrichedEntry {
    fn new(mut entry: AccessLogEntry, metadata: KeyMetadata) -> Self {
        entry.extra.remove(API_KEY_NAME);
        entry.extra.remove(API_KEY_DESCRIPTION);
        Self {
            entry,
            api_key_name: metadata.name,
            api_key_description: metadata.description,
        }
    }
}

/// Storage layout keys derived from processing time only.
pub fn partition_keys(now: DateTime<Utc>) -> HashMap<String, String> {
    HashMap::from([
        ("year".to_string(), now.year().to_string()),
        ("month".to_string(), now.month().to_string()),
        ("day".to_string(), now.day().to_string()),
        ("hour".to_string(), now.hour().to_string()),
    ])
}

fn decode(record: &StreamRecord) -> Result<AccessLogEntry, HandlerError> {
    let entry: AccessLogEntry =
        serde_json::from_slice(&record.data).map_err(|source| HandlerError::MalformedInput {
            record_id: record.record_id.clone(),
            source,
        })?;

    if entry.api_key_id.is_empty() {
        return Err(HandlerError::missing(API_KEY_ID));
    }
    Ok(entry)
}

/// Enriches a whole batch or nothing.
///
/// Every payload is decoded before the first lookup. Lookups run with up to
/// `concurrency` in flight and results keep input order.
pub async fn enrich<K: KeyDirectory>(
    keys: &K,
    records: Vec<StreamRecord>,
    now: DateTime<Utc>,
    concurrency: usize,
) -> Result<Vec<EnrichedRecord>, HandlerError> {
    let entries = records
        .into_iter()
        .map(|record| decode(&record).map(|entry| (record.record_id, entry)))
        .collect::<Result<Vec<_>, _>>()?;

    let partition_keys = partition_keys(now);
    tracing::debug!(records = entries.len(), ?partition_keys, "enriching batch");

    stream::iter(entries)
        .map(|(record_id, entry)| {
            let partition_keys = &partition_keys;
            async move {
                let metadata = keys.key_metadata(&entry.api_key_id).await?;
                let data = serde_json::to_vec(&EnrichedEntry::new(entry, metadata)).map_err(
                    |source| HandlerError::MalformedInput {
                        record_id: record_id.clone(),
                        source,
                    },
                )?;
                Ok::<_, HandlerError>(EnrichedRecord {
                    record_id,
                    data,
                    partition_keys: partition_keys.clone(),
                })
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

pub fn records_from_event(event: KinesisFirehoseEvent) -> Vec<StreamRecord> {
    event
        .records
        .into_iter()
        .map(|record| StreamRecord {
            record_id: record.record_id.unwrap_or_default(),
            data: record.data.0,
        })
        .collect()
}

pub fn response_from_records(records: Vec<EnrichedRecord>) -> KinesisFirehoseResponse {
    KinesisFirehoseResponse {
        records: records
            .into_iter()
            .map(|record| KinesisFirehoseResponseRecord {
                record_id: Some(record.record_id),
                result: Some(RecordResult::Ok.as_str().to_string()),
                data: Base64Data(record.data),
                metadata: KinesisFirehoseResponseRecordMetadata {
                    partition_keys: record.partition_keys,
                },
            })
            .collect(),
    }
}

/// Full transform from the delivery stream's event to its response.
pub async fn handle_event<K: KeyDirectory>(
    keys: &K,
    event: KinesisFirehoseEvent,
    now: DateTime<Utc>,
    concurrency: usize,
) -> Result<KinesisFirehoseResponse, HandlerError> {
    let records = records_from_event(event);
    tracing::info!(records = records.len(), "received delivery stream batch");

    let enriched = enrich(keys, records, now, concurrency).await?;
    tracing::info!(records = enriched.len(), "batch enriched");

    Ok(response_from_records(enriched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::fakes::FakeKeys;
    use chrono::TimeZone;
    use serde_json::json;

    fn processing_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap()
    }

    fn record(id: &str, payload: Value) -> StreamRecord {
        StreamRecord {
            record_id: id.to_string(),
            data: serde_json::to_vec(&payload).unwrap(),
        }
    }

    fn log_line(request_id: &str, key_id: &str) -> Value {
        json!({
            "requestId": request_id,
            "apiId": "a1",
            "identity.apiKeyId": key_id,
            "stage": "prod"
        })
    }

    fn keys() -> FakeKeys {
        FakeKeys::default()
            .with_key("k1", "Key1", "desc")
            .with_key("k2", "Key2", "")
    }

    #[test]
    fn partition_keys_are_not_zero_padded() {
        let keys = partition_keys(Utc.with_ymd_and_hms(2024, 3, 5, 4, 59, 59).unwrap());

        assert_eq!(keys["year"], "2024");
        assert_eq!(keys["month"], "3");
        assert_eq!(keys["day"], "5");
        assert_eq!(keys["hour"], "4");
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn partition_keys_only_depend_on_the_hour() {
        let early = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 1).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();

        assert_eq!(partition_keys(early), partition_keys(late));
    }

    #[tokio::test]
    async fn merges_key_metadata_into_log_entry() {
        let keys = keys();

        let output = enrich(
            &keys,
            vec![record("rec-1", log_line("r1", "k1"))],
            processing_time(),
            1,
        )
        .await
        .expect("batch should enrich");

        assert_eq!(output.len(), 1);
        assert_eq!(output[0].record_id, "rec-1");
        let data: Value = serde_json::from_slice(&output[0].data).unwrap();
        assert_eq!(
            data,
            json!({
                "requestId": "r1",
                "apiId": "a1",
                "identity.apiKeyId": "k1",
                "stage": "prod",
                "identity.apiKeyName": "Key1",
                "identity.apiKeyDescription": "desc"
            })
        );
        assert_eq!(
            output[0].partition_keys,
            HashMap::from([
                ("year".to_string(), "2024".to_string()),
                ("month".to_string(), "3".to_string()),
                ("day".to_string(), "5".to_string()),
                ("hour".to_string(), "14".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn keeps_extra_fields_and_replaces_stale_enrichment() {
        let keys = keys();
        let mut line = log_line("r1", "k2");
        line["status"] = json!("200");
        line[API_KEY_NAME] = json!("stale");

        let output = enrich(&keys, vec![record("rec-1", line)], processing_time(), 1)
            .await
            .expect("batch should enrich");

        let data: Value = serde_json::from_slice(&output[0].data).unwrap();
        assert_eq!(data["status"], "200");
        assert_eq!(data[API_KEY_NAME], "Key2");
        assert_eq!(data[API_KEY_DESCRIPTION], "");
    }

    #[tokio::test]
    async fn output_preserves_input_order_at_any_concurrency() {
        let keys = keys();
        let batch: Vec<StreamRecord> = (0..8)
            .map(|i| {
                let key = if i % 2 == 0 { "k1" } else { "k2" };
                record(&format!("rec-{i}"), log_line(&format!("r{i}"), key))
            })
            .collect();
        let expected: Vec<String> = batch.iter().map(|r| r.record_id.clone()).collect();

        for concurrency in [0, 1, 3, 16] {
            let output = enrich(&keys, batch.clone(), processing_time(), concurrency)
                .await
                .expect("batch should enrich");

            let ids: Vec<String> = output.into_iter().map(|r| r.record_id).collect();
            assert_eq!(ids, expected, "concurrency {concurrency}");
        }
    }

    #[tokio::test]
    async fn malformed_record_fails_batch_before_any_lookup() {
        let keys = keys();
        let batch = vec![
            record("rec-1", log_line("r1", "k1")),
            StreamRecord {
                record_id: "rec-2".to_string(),
                data: b"not json".to_vec(),
            },
        ];

        let error = enrich(&keys, batch, processing_time(), 1)
            .await
            .expect_err("batch should fail");

        assert!(
            matches!(error, HandlerError::MalformedInput { ref record_id, .. } if record_id == "rec-2")
        );
        assert!(keys.lookups().is_empty());
    }

    #[tokio::test]
    async fn missing_key_id_is_a_missing_parameter() {
        let keys = keys();
        let batch = vec![record("rec-1", json!({"requestId": "r1", "stage": "prod"}))];

        let error = enrich(&keys, batch, processing_time(), 1)
            .await
            .expect_err("key id is required");

        assert!(matches!(error, HandlerError::MissingParameter { ref name } if name == API_KEY_ID));
    }

    #[tokio::test]
    async fn failed_lookup_fails_the_whole_batch() {
        let keys = keys();
        let batch = vec![
            record("rec-1", log_line("r1", "k1")),
            record("rec-2", log_line("r2", "unknown")),
            record("rec-3", log_line("r3", "k2")),
        ];

        let error = enrich(&keys, batch, processing_time(), 1)
            .await
            .expect_err("batch should fail");

        assert!(matches!(error, HandlerError::Dependency { .. }));
        assert_eq!(keys.lookups(), vec!["k1".to_string(), "unknown".to_string()]);
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_response() {
        let keys = keys();

        let output = enrich(&keys, Vec::new(), processing_time(), 1)
            .await
            .expect("empty batch is fine");

        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn handles_delivery_stream_event_shape() {
        let keys = keys();
        let event: KinesisFirehoseEvent = serde_json::from_value(json!({
            "invocationId": "inv-1",
            "deliveryStreamArn": "arn:aws:firehose:eu-west-1:123456789012:deliverystream/api-logs",
            "region": "eu-west-1",
            "records": [
                {
                    "recordId": "49546986683135544286507457936321625675700192471156785154",
                    "approximateArrivalTimestamp": 1709647200000i64,
                    "data": "eyJyZXF1ZXN0SWQiOiJyMSIsImFwaUlkIjoiYTEiLCJpZGVudGl0eS5hcGlLZXlJZCI6ImsxIiwic3RhZ2UiOiJwcm9kIn0="
                },
                {
                    "recordId": "49546986683135544286507457936321625675700192471156785155",
                    "approximateArrivalTimestamp": 1709647200000i64,
                    "data": "eyJyZXF1ZXN0SWQiOiJyMiIsImFwaUlkIjoiYTEiLCJpZGVudGl0eS5hcGlLZXlJZCI6ImsyIiwic3RhZ2UiOiJwcm9kIn0="
                }
            ]
        }))
        .expect("firehose event should parse");

        let response = handle_event(&keys, event, processing_time(), 2)
            .await
            .expect("batch should enrich");

        assert_eq!(response.records.len(), 2);
        assert_eq!(
            response.records[0].record_id.as_deref(),
            Some("49546986683135544286507457936321625675700192471156785154")
        );
        assert_eq!(
            response.records[1].record_id.as_deref(),
            Some("49546986683135544286507457936321625675700192471156785155")
        );
        for record in &response.records {
            assert_eq!(record.result.as_deref(), Some("Ok"));
            assert_eq!(record.metadata.partition_keys["hour"], "14");
        }
        let second: Value = serde_json::from_slice(&response.records[1].data.0).unwrap();
        assert_eq!(second[API_KEY_NAME], "Key2");
        assert_eq!(keys.lookups(), vec!["k1".to_string(), "k2".to_string()]);
    }
}
