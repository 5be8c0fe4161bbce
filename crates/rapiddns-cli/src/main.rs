//! rapiddns - command-line client for the RapidDNS API.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rapiddns_cli::run().await
}
