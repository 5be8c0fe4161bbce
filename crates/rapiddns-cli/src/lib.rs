//! # rapiddns-cli
//!
//! Command-line interface for the RapidDNS DNS intelligence API.
//!
//! ## Features
//!
//! - **Search**: keyword search with automatic pagination
//! - **Query**: advanced query syntax (`domain:apple AND tld:com`)
//! - **Export**: bulk export tasks with polling, download and ZIP extraction
//! - **Extraction**: unique subdomains, IPs and per-subnet statistics to files
//! - **Output formats**: JSON, CSV and tab-separated text

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
