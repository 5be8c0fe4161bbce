use serde::{Deserialize, Serialize};

use super::record::{lenient_string, lenient_u64};

/// Kind of query an export task runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportQueryType {
    /// All records under a domain
    #[default]
    Subdomain,
    /// Domains sharing an IP
    Sameip,
    /// Domains inside an IP segment
    IpSegment,
    /// Advanced query syntax
    Advanced,
}

impl ExportQueryType {
    /// Wire value for the `query_type` field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::Sameip => "sameip",
            Self::IpSegment => "ip_segment",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for ExportQueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /export-data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    /// Kind of query
    pub query_type: ExportQueryType,

    /// Domain, IP, segment or advanced query text
    pub query_input: String,

    /// Result cap (0 means no cap)
    pub max_results: u64,

    /// Ask the server for a ZIP archive instead of a bare CSV
    pub compress: bool,
}

impl ExportRequest {
    /// Create a request with no result cap and compression enabled
    #[must_use]
    pub fn new(query_type: ExportQueryType, query_input: impl Into<String>) -> Self {
        Self {
            query_type,
            query_input: query_input.into(),
            max_results: 0,
            compress: true,
        }
    }

    /// Set the result cap
    #[must_use]
    pub const fn max_results(mut self, max: u64) -> Self {
        self.max_results = max;
        self
    }

    /// Enable or disable compression
    #[must_use]
    pub const fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Payload returned when an export task is submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTicket {
    /// Identifier to poll with
    #[serde(default, deserialize_with = "lenient_string")]
    pub export_id: String,
}

/// Lifecycle state of an export task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportState {
    /// Queued on the server
    Pending,
    /// Running
    Processing,
    /// Finished; a download URL should be present
    Completed,
    /// Finished unsuccessfully
    Failed,
    /// Missing, or a state this client does not know about; polled like `processing`
    #[default]
    Unknown,
}

impl ExportState {
    /// Interpret a raw `status` string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Returns true for `completed` and `failed`
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ExportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Server-side export job as reported by `GET /export-data/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTask {
    /// Task identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// State string exactly as the server reported it
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,

    /// Completion percentage (0-100)
    #[serde(default, deserialize_with = "lenient_u64")]
    pub progress_percent: u64,

    /// Download location once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl ExportTask {
    /// Lifecycle state parsed from [`status`](Self::status)
    #[must_use]
    pub fn state(&self) -> ExportState {
        ExportState::parse(&self.status)
    }

    /// Download URL, treating an empty string as absent
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let req = ExportRequest::new(ExportQueryType::IpSegment, "1.2.3.0/24")
            .max_results(500)
            .compress(false);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["query_type"], "ip_segment");
        assert_eq!(json["query_input"], "1.2.3.0/24");
        assert_eq!(json["max_results"], 500);
        assert_eq!(json["compress"], false);
    }

    #[test]
    fn test_task_parsing() {
        let task: ExportTask = serde_json::from_str(
            r#"{"id":"abc","status":"completed","progress_percent":100,"download_url":"https://x/y.zip"}"#,
        )
        .unwrap();
        assert_eq!(task.state(), ExportState::Completed);
        assert!(task.state().is_terminal());
        assert_eq!(task.download_url(), Some("https://x/y.zip"));
    }

    #[test]
    fn test_unknown_state_is_not_terminal() {
        let task: ExportTask =
            serde_json::from_str(r#"{"id":"abc","status":"queued_for_review"}"#).unwrap();
        assert_eq!(task.state(), ExportState::Unknown);
        assert!(!task.state().is_terminal());
        assert_eq!(task.download_url(), None);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "queued_for_review");
    }

    #[test]
    fn test_empty_download_url_is_absent() {
        let task: ExportTask =
            serde_json::from_str(r#"{"id":"abc","status":"completed","download_url":""}"#)
                .unwrap();
        assert_eq!(task.download_url(), None);
    }
}
