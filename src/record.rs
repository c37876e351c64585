//! Trace records
//!
//! A record is one event of the host's timeline stream. The wire form is a
//! JSON object with a numeric `type`, a start `time`, an optional
//! `duration`, nested `children` and a kind-specific `data` payload. The
//! payload is decoded into [`RecordData`] according to the kind, so rules
//! match on typed variants instead of probing JSON fields.
//!
//! # Example
//!
//! ```
//! use hintlet::record::{Record, RecordData};
//! use hintlet::record_type::RecordType;
//!
//! let record = Record::from_json(
//!     r#"{"type": 14, "time": 10.5, "data": {"identifier": 7, "didFail": false}}"#,
//! )?;
//! assert_eq!(record.kind, RecordType::ResourceFinish);
//! assert_eq!(record.resource_identifier(), Some("7"));
//! assert!(matches!(record.data, RecordData::ResourceFinish(_)));
//! # Ok::<(), hintlet::record::RecordError>(())
//! ```

use crate::record_type::RecordType;
use crate::resources::ResourceUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload for {kind} record: {message}")]
    InvalidPayload { kind: RecordType, message: String },
}

/// One `[subtype, count, timeSpent]` entry of an aggregate record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEvent(pub RecordType, pub u64, pub f64);

impl AggregatedEvent {
    pub fn subtype(&self) -> RecordType {
        self.0
    }

    pub fn count(&self) -> u64 {
        self.1
    }

    /// Time spent in the folded events
    pub fn time_spent(&self) -> f64 {
        self.2
    }
}

/// Payload of a resource-send-request record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStart {
    #[serde(deserialize_with = "identifier::deserialize")]
    pub identifier: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    #[serde(default)]
    pub is_main_resource: bool,
}

/// Payload of a resource-receive-response record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    #[serde(deserialize_with = "identifier::deserialize")]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_content_length: Option<i64>,
}

/// Payload of a resource-finish record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFinish {
    #[serde(deserialize_with = "identifier::deserialize")]
    pub identifier: String,
    #[serde(default)]
    pub did_fail: bool,
}

/// Payload of a tab-changed record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Kind-specific record payload
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    AggregatedEvents(Vec<AggregatedEvent>),
    ResourceStart(ResourceStart),
    ResourceResponse(ResourceResponse),
    ResourceFinish(ResourceFinish),
    ResourceUpdate(ResourceUpdate),
    TabChanged(TabChange),
    /// Payload of a kind the engine does not interpret
    Other(Value),
}

impl RecordData {
    /// Decode a raw payload according to the record kind
    pub fn decode(kind: RecordType, data: Value) -> Result<Self, RecordError> {
        fn typed<T: serde::de::DeserializeOwned>(
            kind: RecordType,
            data: Value,
        ) -> Result<T, RecordError> {
            serde_json::from_value(data).map_err(|e| RecordError::InvalidPayload {
                kind,
                message: e.to_string(),
            })
        }

        Ok(match kind {
            RecordType::AggregatedEvents => {
                #[derive(Deserialize)]
                struct Aggregate {
                    #[serde(default)]
                    events: Vec<AggregatedEvent>,
                }
                if data.is_null() {
                    return Ok(RecordData::AggregatedEvents(Vec::new()));
                }
                let aggregate: Aggregate = typed(kind, data)?;
                RecordData::AggregatedEvents(aggregate.events)
            }
            RecordType::ResourceSendRequest => RecordData::ResourceStart(typed(kind, data)?),
            RecordType::ResourceReceiveResponse => {
                RecordData::ResourceResponse(typed(kind, data)?)
            }
            RecordType::ResourceFinish => RecordData::ResourceFinish(typed(kind, data)?),
            RecordType::ResourceUpdated => RecordData::ResourceUpdate(typed(kind, data)?),
            RecordType::TabChanged => {
                if data.is_null() {
                    RecordData::TabChanged(TabChange::default())
                } else {
                    RecordData::TabChanged(typed(kind, data)?)
                }
            }
            _ => RecordData::Other(data),
        })
    }

    /// Re-encode the payload into its wire form
    pub fn encode(&self) -> Value {
        let encoded = match self {
            RecordData::AggregatedEvents(events) => {
                serde_json::to_value(events).map(|events| serde_json::json!({ "events": events }))
            }
            RecordData::ResourceStart(start) => serde_json::to_value(start),
            RecordData::ResourceResponse(response) => serde_json::to_value(response),
            RecordData::ResourceFinish(finish) => serde_json::to_value(finish),
            RecordData::ResourceUpdate(update) => serde_json::to_value(update),
            RecordData::TabChanged(tab) => serde_json::to_value(tab),
            RecordData::Other(value) => Ok(value.clone()),
        };
        encoded.unwrap_or(Value::Null)
    }
}

/// One trace event, possibly with nested children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord", into = "RawRecord")]
pub struct Record {
    /// Engine-assigned sequence number; `None` until ingested
    pub sequence: Option<u64>,
    pub kind: RecordType,
    /// Event start, host clock units
    pub time: f64,
    /// `None` for instantaneous events
    pub duration: Option<f64>,
    pub data: RecordData,
    pub children: Vec<Record>,
    /// Time exclusive of children; filled in by the engine
    pub self_duration: Option<f64>,
}

impl Record {
    /// Instantaneous record with no payload
    pub fn new(kind: RecordType, time: f64) -> Self {
        Self {
            sequence: None,
            kind,
            time,
            duration: None,
            data: RecordData::Other(Value::Null),
            children: Vec::new(),
            self_duration: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_children(mut self, children: Vec<Record>) -> Self {
        self.children = children;
        self
    }

    pub fn with_data(mut self, data: RecordData) -> Self {
        self.data = data;
        self
    }

    /// Parse a single record from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let raw: RawRecord = serde_json::from_str(json)?;
        Record::try_from(raw)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Identifier of the network resource this record refers to, if any
    pub fn resource_identifier(&self) -> Option<&str> {
        match &self.data {
            RecordData::ResourceStart(start) => Some(&start.identifier),
            RecordData::ResourceResponse(response) => Some(&response.identifier),
            RecordData::ResourceFinish(finish) => Some(&finish.identifier),
            RecordData::ResourceUpdate(update) => Some(&update.identifier),
            _ => None,
        }
    }

    pub fn is_ui_event(&self) -> bool {
        self.kind.is_ui_event()
    }
}

/// Wire form of a record
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sequence: Option<u64>,
    #[serde(rename = "type")]
    kind: RecordType,
    #[serde(default)]
    time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<RawRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    self_duration: Option<f64>,
}

impl TryFrom<RawRecord> for Record {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let children = raw
            .children
            .into_iter()
            .map(Record::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Record {
            sequence: raw.sequence,
            kind: raw.kind,
            time: raw.time,
            duration: raw.duration,
            data: RecordData::decode(raw.kind, raw.data)?,
            children,
            self_duration: raw.self_duration,
        })
    }
}

impl From<Record> for RawRecord {
    fn from(record: Record) -> Self {
        RawRecord {
            sequence: record.sequence,
            kind: record.kind,
            time: record.time,
            duration: record.duration,
            data: record.data.encode(),
            children: record.children.into_iter().map(RawRecord::from).collect(),
            self_duration: record.self_duration,
        }
    }
}

/// Resource identifiers arrive as strings or numbers depending on the host
pub(crate) mod identifier {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Number(serde_json::Number),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(text) => text,
            Wire::Number(number) => number.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeline_record_with_children() {
        let record = Record::from_json(
            r#"{"type": 0, "time": 1.0, "duration": 100.0,
                "children": [{"type": 1, "time": 2.0, "duration": 10.0}]}"#,
        )
        .unwrap();
        assert_eq!(record.kind, RecordType::DomEvent);
        assert_eq!(record.duration, Some(100.0));
        assert_eq!(record.children.len(), 1);
        assert_eq!(record.children[0].kind, RecordType::Layout);
        assert!(record.self_duration.is_none());
        assert!(record.sequence.is_none());
    }

    #[test]
    fn test_parse_aggregate_tuples() {
        let record = Record::from_json(
            r#"{"type": 2147483647, "time": 0, "duration": 50,
                "data": {"events": [[1, 4, 12.5], [3, 2, 7]]}}"#,
        )
        .unwrap();
        let RecordData::AggregatedEvents(events) = &record.data else {
            panic!("expected aggregate payload");
        };
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].subtype(), RecordType::Layout);
        assert_eq!(events[0].count(), 4);
        assert_eq!(events[1].time_spent(), 7.0);
    }

    #[test]
    fn test_numeric_identifier_becomes_string() {
        let record =
            Record::from_json(r#"{"type": 12, "time": 0, "data": {"identifier": 42, "url": "http://a/"}}"#)
                .unwrap();
        assert_eq!(record.resource_identifier(), Some("42"));
    }

    #[test]
    fn test_invalid_payload_rejected() {
        let err = Record::from_json(r#"{"type": 12, "time": 0, "data": {"identifier": 1}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidPayload {
                kind: RecordType::ResourceSendRequest,
                ..
            }
        ));
        assert!(err.to_string().contains("Resource Request"));
    }

    #[test]
    fn test_unknown_kind_keeps_raw_payload() {
        let record = Record::from_json(r#"{"type": 77, "time": 3, "data": {"x": 1}}"#).unwrap();
        assert_eq!(record.kind, RecordType::Unknown(77));
        assert_eq!(record.data, RecordData::Other(serde_json::json!({"x": 1})));
    }

    #[test]
    fn test_serialized_form_carries_computed_fields() {
        let mut record = Record::new(RecordType::Paint, 5.0).with_duration(3.0);
        record.sequence = Some(9);
        record.self_duration = Some(3.0);
        let value: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], 3);
        assert_eq!(value["sequence"], 9);
        assert_eq!(value["selfDuration"], 3.0);
        assert!(value.get("data").is_none());
        assert!(value.get("children").is_none());
    }

    #[test]
    fn test_tab_changed_without_payload() {
        let record = Record::from_json(r#"{"type": 2147483646, "time": 0}"#).unwrap();
        assert_eq!(record.data, RecordData::TabChanged(TabChange::default()));
    }
}
