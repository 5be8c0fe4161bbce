//! `rapiddns search` - Search by keyword.

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::{emit, finish_pagination, Context};
use crate::cli::args::SearchArgs;
use crate::output::Console;

pub async fn execute(ctx: Context, args: SearchArgs) -> Result<()> {
    ctx.warn_if_anonymous();

    let client = ctx.client()?;
    let console = Console::new(args.output.silent);

    let mut builder = client
        .search()
        .keyword(&args.keyword)
        .page(args.page)
        .page_size(args.pagesize)
        .max_records(args.max);

    if let Some(search_type) = args.search_type {
        builder = builder.search_type(search_type.into());
    }

    console.info(format!("Fetching up to {} records...", args.max));
    let spinner = fetch_spinner(console);
    let result = builder
        .fetch_all_with(|p| spinner.set_message(format!("Fetched {} records...", p.accumulated)))
        .await;
    spinner.finish_and_clear();
    let result = result.context("search failed")?;
    console.info(format!("Done. {} records.", result.records.len()));

    let records = finish_pagination(result, console);
    emit(&records, &args.keyword, &args.output)
}

/// Spinner for page fetching, hidden in silent mode.
pub(super) fn fetch_spinner(console: Console) -> ProgressBar {
    if console.silent {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
