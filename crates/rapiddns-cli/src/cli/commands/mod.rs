//! Command implementations.

pub mod config;
pub mod export;
pub mod query;
pub mod search;

use anyhow::Result;
use colored::Colorize;
use rapiddns::{Paginated, RapidDnsClient, RecordSet};

use crate::cli::args::OutputArgs;
use crate::output::files::{self, DerivedPaths};
use crate::output::{self as render, Console};

const PRICING_HINT: &str =
    "If you are not a PRO or MAX member, please purchase a plan at: https://rapiddns.io/pricing";
const SET_KEY_HINT: &str = "Then configure your API key using: rapiddns config set-key <YOUR_API_KEY>";

/// Shared context for all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// RapidDNS API key
    pub api_key: Option<String>,

    /// API base URL override
    pub base_url: Option<String>,

    /// Log verbosity (`-v` count)
    pub verbose: u8,

    /// Disable colors
    pub no_color: bool,
}

impl Context {
    /// Get the API key, returning an error if not set.
    pub fn require_api_key(&self, action: &str) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!("API key is required for {action}.\n{PRICING_HINT}\n{SET_KEY_HINT}")
        })
    }

    /// Print the anonymous-access warning when no key is configured.
    pub fn warn_if_anonymous(&self) {
        if self.api_key.is_none() {
            eprintln!(
                "{} No API key configured. Results may be limited.",
                "Warning:".yellow().bold()
            );
            eprintln!("{PRICING_HINT}");
            eprintln!("{SET_KEY_HINT}");
            eprintln!();
        }
    }

    /// Create a RapidDNS client with the configured key and base URL.
    pub fn client(&self) -> Result<RapidDnsClient> {
        let mut builder = RapidDnsClient::builder(self.api_key.clone());
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        Ok(builder.build()?)
    }
}

/// Report a paginated result's interruption, returning its records.
fn finish_pagination(result: Paginated, console: Console) -> RecordSet {
    if let Some(failure) = &result.interrupted {
        console.warn(format!(
            "Stopped fetching at page {} due to error: {}",
            failure.page, failure.error
        ));
    }
    result.records
}

/// Write extraction files, the output file, and console output for a search or query.
fn emit(set: &RecordSet, keyword: &str, args: &OutputArgs) -> Result<()> {
    let console = Console::new(args.silent);

    if args.extract_subdomains || args.extract_ips {
        let paths = DerivedPaths::for_search(args.file.as_deref(), keyword);
        if args.extract_subdomains {
            files::save_subdomains(&paths.subdomains, set, console)?;
        }
        if args.extract_ips {
            files::save_ips(&paths, set, console)?;
        }
    }

    if let Some(file) = &args.file {
        files::save_records(&files::resolve_path(file), set, args.output, console)?;
    } else if !args.silent {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match args.column {
            Some(column) => {
                let values = render::column_values(set, column);
                render::write_column(&mut out, &values, args.output)?;
            }
            None => render::write_records(&mut out, set, args.output)?,
        }
    }

    Ok(())
}
