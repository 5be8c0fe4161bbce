use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;

/// One DNS fact returned by search, advanced query or export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record type (A, AAAA, CNAME, MX, ...)
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub record_type: String,

    /// Record value: an IP, a domain or free text depending on the type
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,

    /// Observation timestamp as sent by the API
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,

    /// Observation date
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,

    /// Subdomain this record belongs to
    #[serde(default, deserialize_with = "lenient_string")]
    pub subdomain: String,
}

impl Record {
    /// Try to parse the value as an IP address
    #[must_use]
    pub fn as_ip(&self) -> Option<IpAddr> {
        self.value.parse().ok()
    }
}

/// Ordered collection of records plus the metadata the API reports with them.
///
/// Order is arrival order; the paginator relies on it when truncating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    /// Record count reported by the API (or accumulated count after pagination)
    pub total: u64,

    /// Status tag reported alongside the records
    pub status: String,

    /// Records in arrival order
    #[serde(rename = "data")]
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Build a set from records, with `total` equal to their count
    #[must_use]
    pub fn from_records(status: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            total: records.len() as u64,
            status: status.into(),
            records,
        }
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in arrival order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Wire shape of a search or query payload.
///
/// Search endpoints put records under `data`, advanced queries under `result`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPayload {
    /// Total reported by the API
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,

    /// Status tag
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,

    /// Records (search endpoints)
    #[serde(default)]
    pub data: Vec<Record>,

    /// Records (advanced query endpoint)
    #[serde(default)]
    pub result: Vec<Record>,
}

impl SearchPayload {
    /// Whether the payload carries anything beyond zero values
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.data.is_empty() || !self.result.is_empty() || self.total > 0 || !self.status.is_empty()
    }
}

impl From<SearchPayload> for RecordSet {
    fn from(payload: SearchPayload) -> Self {
        let records = if payload.data.is_empty() {
            payload.result
        } else {
            payload.data
        };
        Self {
            total: payload.total,
            status: payload.status,
            records,
        }
    }
}

/// Accept a string, a number or a bool where a string is expected; null becomes empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Number(n)) => n.to_string(),
        Some(Loose::Flag(b)) => b.to_string(),
        None => String::new(),
    })
}

/// Accept an unsigned number or its decimal string form; null becomes zero.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(u64),
        Text(String),
    }

    match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(n)) => Ok(n),
        Some(Loose::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_numeric_timestamp() {
        let record: Record = serde_json::from_str(
            r#"{"type":"A","value":"1.2.3.4","timestamp":1700000000,"date":"2023-11-14","subdomain":"www.example.com"}"#,
        )
        .unwrap();
        assert_eq!(record.timestamp, "1700000000");
        assert_eq!(record.record_type, "A");
        assert!(record.as_ip().is_some());
    }

    #[test]
    fn test_record_missing_and_null_fields() {
        let record: Record = serde_json::from_str(r#"{"value":"example.org","date":null}"#).unwrap();
        assert_eq!(record.value, "example.org");
        assert!(record.date.is_empty());
        assert!(record.subdomain.is_empty());
        assert!(record.as_ip().is_none());
    }

    #[test]
    fn test_payload_prefers_data_over_result() {
        let payload: SearchPayload = serde_json::from_str(
            r#"{"total":"2","status":"ok","data":[{"value":"a"}],"result":[{"value":"b"},{"value":"c"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.total, 2);
        let set = RecordSet::from(payload);
        assert_eq!(set.len(), 1);
        assert_eq!(set.records[0].value, "a");
    }

    #[test]
    fn test_payload_falls_back_to_result() {
        let payload: SearchPayload =
            serde_json::from_str(r#"{"result":[{"value":"b"}]}"#).unwrap();
        assert!(payload.has_content());
        assert_eq!(RecordSet::from(payload).records[0].value, "b");
    }

    #[test]
    fn test_empty_payload_has_no_content() {
        let payload: SearchPayload = serde_json::from_str("{}").unwrap();
        assert!(!payload.has_content());
    }

    #[test]
    fn test_record_set_serializes_records_as_data() {
        let set = RecordSet::from_records("ok", vec![Record::default()]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["status"], "ok");
        assert!(json["data"].is_array());
    }
}
