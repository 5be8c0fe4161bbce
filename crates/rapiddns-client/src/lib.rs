//! HTTP client for the RapidDNS API.
//!
//! This crate provides the main [`RapidDnsClient`] along with the paginator
//! and the export workflow built on top of it.

#![doc(html_root_url = "https://docs.rs/rapiddns-client/0.3.0")]

pub mod api;
pub mod archive;
mod client;
mod config;
pub mod export;
pub mod paginate;

pub use client::{RapidDnsClient, RapidDnsClientBuilder, DEFAULT_BASE_URL};
pub use config::*;
pub use export::{ExportJob, ExportObserver, ExportOutcome};
pub use paginate::{PageProgress, PageSource, Paginated, Paginator};
pub use rapiddns_core::{RapidDnsError, Result};
