//! `rapiddns export` - Bulk export tasks.

use anyhow::{Context as _, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rapiddns::{ExportObserver, ExportRequest, ExportTask, PollConfig, RapidDnsError};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Context;
use crate::cli::args::{ExportArgs, ExportCommands, ExportStartArgs};
use crate::output::files::{self, DerivedPaths};
use crate::output::Console;

pub async fn execute(ctx: Context, args: ExportArgs) -> Result<()> {
    match args.command {
        ExportCommands::Start(args) => start(ctx, args).await,
        ExportCommands::Status { task_id } => status(ctx, &task_id).await,
    }
}

async fn start(ctx: Context, args: ExportStartArgs) -> Result<()> {
    ctx.require_api_key("export operations")?;
    let client = ctx.client()?;
    let console = Console::new(args.silent);

    let request = ExportRequest::new(args.export_type.into(), &args.query_input)
        .max_results(args.max)
        .compress(args.compress);

    console.info(format!(
        "Starting export task for '{}' (Type: {}, Max: {})...",
        args.query_input, request.query_type, request.max_results
    ));

    let poll = PollConfig::default().deadline(args.timeout.map(Duration::from_secs));
    let wants_records = args.extract_subdomains || args.extract_ips;
    let mut progress = ExportProgress::new(console);

    let outcome = client
        .export()
        .start(request)
        .output_dir(&args.output_dir)
        .poll(poll)
        .parse_records(wants_records)
        .run(&mut progress)
        .await;
    progress.finish();
    let outcome = outcome.context("export failed")?;

    if console.silent {
        console.written(&files::absolute(&outcome.download_path), "");
        for file in &outcome.extracted {
            console.written(&files::absolute(file), "");
        }
    }

    if wants_records {
        match &outcome.records {
            Some(records) => {
                console.info("Processing CSV for extraction...");
                let paths = DerivedPaths::in_dir(&args.output_dir, &args.query_input);
                if args.extract_subdomains {
                    files::save_subdomains(&paths.subdomains, records, console)?;
                }
                if args.extract_ips {
                    files::save_ips(&paths, records, console)?;
                }
            }
            None => console.warn("Could not find a CSV file to extract data from."),
        }
    }

    console.info("Export task finished.");
    Ok(())
}

async fn status(ctx: Context, task_id: &str) -> Result<()> {
    ctx.require_api_key("checking export status")?;
    let client = ctx.client()?;

    let task = client
        .export()
        .status(task_id)
        .await
        .context("checking export status failed")?;
    println!("{}", serde_json::to_string_pretty(&task)?);

    Ok(())
}

/// Renders export lifecycle events with a progress bar on stderr.
struct ExportProgress {
    console: Console,
    bar: ProgressBar,
}

impl ExportProgress {
    fn new(console: Console) -> Self {
        let bar = if console.silent {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(100);
            if let Ok(style) =
                ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        };
        Self { console, bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn line(&self, message: impl AsRef<str>) {
        if !self.console.silent {
            self.bar.println(message.as_ref());
        }
    }
}

impl ExportObserver for ExportProgress {
    fn submitted(&mut self, task_id: &str) {
        self.line(format!("Export task started. Task ID: {}", task_id.cyan()));
        self.bar.set_message("waiting for task completion");
    }

    fn progress(&mut self, task: &ExportTask) {
        self.bar.set_position(task.progress_percent.min(100));
        self.bar.set_message(format!("Status: {}", task.status));
    }

    fn poll_failed(&mut self, _error: &RapidDnsError, retry_in: Duration) {
        self.bar
            .set_message(format!("status check failed, retrying in {}s", retry_in.as_secs()));
    }

    fn downloading(&mut self, _url: &str, dest: &Path) {
        self.bar.set_message("downloading");
        self.line(format!("Downloading result to {}...", dest.display()));
    }

    fn downloaded(&mut self, _path: &Path, bytes: u64) {
        self.bar.set_position(100);
        self.line(format!("{} ({bytes} bytes)", "Download completed successfully!".green()));
    }

    fn extracted(&mut self, files: &[PathBuf]) {
        self.line("Decompressed files:");
        for f in files {
            self.line(format!("- {}", f.display()));
        }
    }
}
