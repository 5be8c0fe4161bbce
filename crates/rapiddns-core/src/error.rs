use std::time::Duration;
use thiserror::Error;

/// Result type alias for RapidDNS operations
pub type Result<T> = std::result::Result<T, RapidDnsError>;

/// Errors that can occur when using the RapidDNS API
#[derive(Error, Debug)]
pub enum RapidDnsError {
    /// The API rejected the credential (HTTP 401/403)
    #[error(
        "API key is invalid or expired. Please check your configuration or purchase a plan at https://rapiddns.io/pricing"
    )]
    Auth {
        /// HTTP status code (401 or 403)
        status: u16,
    },

    /// Non-auth HTTP error status
    #[error("API error: HTTP {status}")]
    Transport {
        /// HTTP status code
        status: u16,
    },

    /// The request never produced a response (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Well-formed envelope reporting a logical failure
    #[error("API error: {message}")]
    Api {
        /// Message carried by the envelope's `msg` field
        message: String,
    },

    /// The payload was a bare diagnostic string instead of structured data
    #[error("API returned data message: '{0}'. Please check your API key or parameters.")]
    DataMessage(String),

    /// The payload matched none of the expected shapes
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Export task reached the terminal `failed` state
    #[error("export task {task_id} failed")]
    ExportFailed {
        /// Server-side task identifier
        task_id: String,
    },

    /// Polling gave up after the configured deadline
    #[error("export task {task_id} still running after {waited:?}")]
    ExportTimeout {
        /// Server-side task identifier
        task_id: String,
        /// Time spent polling
        waited: Duration,
    },

    /// Export task completed without a download location
    #[error("export task {task_id} completed but no download URL was returned")]
    MissingDownloadUrl {
        /// Server-side task identifier
        task_id: String,
    },

    /// Archive entry would be written outside the destination directory
    #[error("illegal file path in archive: {entry}")]
    PathTraversal {
        /// Entry name as stored in the archive
        entry: String,
    },

    /// Archive could not be read
    #[error("archive error: {0}")]
    Archive(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl RapidDnsError {
    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns true for transport and decode failures.
    ///
    /// Export polling retries these instead of aborting.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Auth { .. }
                | Self::Transport { .. }
                | Self::Http(_)
                | Self::Api { .. }
                | Self::DataMessage(_)
                | Self::MalformedResponse(_)
                | Self::Json(_)
        )
    }

    /// Returns the HTTP status code if the server answered with an error status
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Auth { status } | Self::Transport { status } => Some(*status),
            _ => None,
        }
    }
}
