//! Core types and response handling for the RapidDNS API client.
//!
//! This crate provides the transport-independent parts of the library:
//!
//! - **Types**: [`Record`], [`RecordSet`], [`ExportTask`] and the request enums
//! - **Errors**: The [`RapidDnsError`] taxonomy
//! - **Envelope decoding**: [`envelope::decode`] turns a raw response into a payload
//! - **CSV import**: [`RecordSet::from_csv_reader`] for export files
//! - **Extraction**: [`extract::subdomains`] and [`extract::ips`]
//!
//! # Example
//!
//! ```rust
//! use rapiddns_core::envelope::{decode, StatusRule};
//! use rapiddns_core::{extract, RecordSet};
//!
//! let body = br#"{"status":200,"msg":"ok","data":{"total":1,"status":"ok",
//!     "data":[{"type":"A","value":"1.2.3.4","subdomain":"www.example.com"}]}}"#;
//! let set: RecordSet = decode(200, body, StatusRule::Lenient).unwrap();
//! assert_eq!(extract::ips(&set).ips, vec!["1.2.3.4"]);
//! ```

#![doc(html_root_url = "https://docs.rs/rapiddns-core/0.3.0")]

pub mod envelope;
mod error;
pub mod extract;
mod import;
pub mod types;

pub use error::{RapidDnsError, Result};
pub use types::*;
