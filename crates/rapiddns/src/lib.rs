//! Rust client for the RapidDNS DNS intelligence API.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rapiddns::{extract, RapidDnsClient};
//!
//! #[tokio::main]
//! async fn main() -> rapiddns::Result<()> {
//!     let client = RapidDnsClient::new(Some("your-api-key".into()))?;
//!
//!     // Fetch every page up to 5000 records
//!     let result = client.search()
//!         .keyword("example.com")
//!         .max_records(5000)
//!         .fetch_all()
//!         .await?;
//!
//!     for subdomain in extract::subdomains(&result.records) {
//!         println!("{subdomain}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/rapiddns/0.3.0")]

// Re-export core types
pub use rapiddns_core::*;

// Re-export client
pub use rapiddns_client::{
    api, archive, export, paginate, ExportJob, ExportObserver, ExportOutcome, PageProgress,
    PageSource, Paginated, Paginator, PollConfig, RapidDnsClient, RapidDnsClientBuilder,
    DEFAULT_BASE_URL,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
