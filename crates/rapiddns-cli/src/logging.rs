//! Tracing subscriber setup.

use anyhow::Result;
use tracing::subscriber::set_global_default;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Crates whose events are shown at the `-v` level.
const CRATES: [&str; 4] = ["rapiddns", "rapiddns_client", "rapiddns_core", "rapiddns_cli"];

pub struct Logging {
    verbosity: u8,
    color: bool,
}

impl Logging {
    pub const fn new(verbosity: u8, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn log_level(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn directives(verbosity: u8) -> String {
        let level = Self::log_level(verbosity).to_string().to_lowercase();
        CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Install the global subscriber; logs go to stderr.
    pub fn start(self) -> Result<()> {
        // RUST_LOG overrides the -v level when set
        let filter = if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(Self::directives(self.verbosity))
        };

        let fmt = fmt::layer()
            .with_ansi(self.color)
            .with_target(false)
            .with_writer(std::io::stderr);

        let registry = tracing_subscriber::registry().with(filter).with(fmt);
        set_global_default(registry)?;

        Ok(())
    }
}
