//! Command-line argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rapiddns::{ExportQueryType, SearchType};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Command-line interface for the RapidDNS API
///
/// Query DNS data, search domains, IPs and CIDR ranges, and export results
/// directly from your terminal.
///
/// Get an API key at: https://rapiddns.io/pricing
#[derive(Parser, Debug)]
#[command(name = "rapiddns")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// RapidDNS API key (or set RAPIDDNS_API_KEY env var)
    #[arg(short = 'k', long, env = "RAPIDDNS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override the API base URL
    #[arg(long, env = "RAPIDDNS_BASE_URL", global = true, hide = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search by keyword (domain, IP, or CIDR)
    Search(SearchArgs),

    /// Perform an advanced query search
    ///
    /// Examples:
    ///   rapiddns query 'domain:apple AND tld:com'
    ///   rapiddns query 'type:A AND value:"172.217.3.174"'
    Query(QueryArgs),

    /// Export data operations
    Export(ExportArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Shared output options
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Extract and dedup subdomains to a file
    #[arg(long)]
    pub extract_subdomains: bool,

    /// Extract and dedup IPs to a file with subnet statistics
    #[arg(long)]
    pub extract_ips: bool,

    /// Output file path (relative paths are saved under 'result/')
    #[arg(short, long)]
    pub file: Option<String>,

    /// Print only one column to the console, deduplicated and sorted
    #[arg(long, value_enum)]
    pub column: Option<Column>,

    /// Suppress console output; written file paths are still printed
    #[arg(long)]
    pub silent: bool,
}

/// Column selectable with `--column`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Column {
    /// Record subdomain
    Subdomain,
    /// Record value, when it is an IP address
    Ip,
    /// Record type
    Type,
    /// Record value
    Value,
}

// ============================================================================
// Search command
// ============================================================================

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Domain, IP or CIDR to search for
    pub keyword: String,

    /// Page index to start from
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size per request
    #[arg(long, default_value_t = 100)]
    pub pagesize: u32,

    /// Force search type
    #[arg(long = "type", value_enum)]
    pub search_type: Option<SearchTypeArg>,

    /// Max records to fetch (pagination is handled automatically)
    #[arg(long, default_value_t = 10_000)]
    pub max: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Search type accepted by `--type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SearchTypeArg {
    Subdomain,
    SameDomain,
    Ip,
    IpSegment,
}

impl From<SearchTypeArg> for SearchType {
    fn from(arg: SearchTypeArg) -> Self {
        match arg {
            SearchTypeArg::Subdomain => Self::Subdomain,
            SearchTypeArg::SameDomain => Self::SameDomain,
            SearchTypeArg::Ip => Self::Ip,
            SearchTypeArg::IpSegment => Self::IpSegment,
        }
    }
}

// ============================================================================
// Query command
// ============================================================================

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Advanced query (e.g., "domain:apple AND tld:com")
    pub query: String,

    /// Page index to fetch
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size per request
    #[arg(long, default_value_t = 100)]
    pub pagesize: u32,

    /// Fetch pages until this many records are collected
    #[arg(long)]
    pub max: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

// ============================================================================
// Export command
// ============================================================================

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub command: ExportCommands,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Start an export task, wait for completion, and download the result
    ///
    /// Compression is enabled by default (ZIP) and the archive is extracted
    /// after download. Subdomains and IPs can be extracted from the CSV.
    Start(ExportStartArgs),

    /// Check the status of an export task
    Status {
        /// Task identifier returned by `export start`
        task_id: String,
    },
}

#[derive(Args, Debug)]
pub struct ExportStartArgs {
    /// Domain, IP, segment or advanced query to export
    pub query_input: String,

    /// Export type
    #[arg(long = "type", value_enum, default_value_t = ExportTypeArg::Subdomain)]
    pub export_type: ExportTypeArg,

    /// Max records to export (0 means all)
    #[arg(long, default_value_t = 0)]
    pub max: u64,

    /// Compress the result as ZIP
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub compress: bool,

    /// Extract and dedup subdomains from the exported result
    #[arg(long)]
    pub extract_subdomains: bool,

    /// Extract and dedup IPs from the exported result
    #[arg(long)]
    pub extract_ips: bool,

    /// Directory to write the export to
    #[arg(long, default_value = "result")]
    pub output_dir: PathBuf,

    /// Give up polling after this many seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Suppress progress output; written file paths are still printed
    #[arg(long)]
    pub silent: bool,
}

/// Export type accepted by `--type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ExportTypeArg {
    Subdomain,
    Sameip,
    IpSegment,
    Advanced,
}

impl From<ExportTypeArg> for ExportQueryType {
    fn from(arg: ExportTypeArg) -> Self {
        match arg {
            ExportTypeArg::Subdomain => Self::Subdomain,
            ExportTypeArg::Sameip => Self::Sameip,
            ExportTypeArg::IpSegment => Self::IpSegment,
            ExportTypeArg::Advanced => Self::Advanced,
        }
    }
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set the API key
    SetKey {
        /// API key to store
        key: String,
    },

    /// Show the current API key
    GetKey,

    /// Show the config file path
    Path,
}
