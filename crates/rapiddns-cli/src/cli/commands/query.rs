//! `rapiddns query` - Advanced query search.

use anyhow::{Context as _, Result};

use super::search::fetch_spinner;
use super::{emit, finish_pagination, Context};
use crate::cli::args::QueryArgs;
use crate::output::Console;

pub async fn execute(ctx: Context, args: QueryArgs) -> Result<()> {
    ctx.warn_if_anonymous();

    let client = ctx.client()?;
    let console = Console::new(args.output.silent);

    let builder = client
        .search()
        .query(&args.query)
        .page(args.page)
        .page_size(args.pagesize);

    // A single page unless --max asks for more
    let records = match args.max {
        None => builder.send().await.context("query failed")?,
        Some(max) => {
            console.info(format!("Fetching up to {max} records..."));
            let spinner = fetch_spinner(console);
            let result = builder
                .max_records(max)
                .fetch_all_with(|p| {
                    spinner.set_message(format!("Fetched {} records...", p.accumulated));
                })
                .await;
            spinner.finish_and_clear();
            finish_pagination(result.context("query failed")?, console)
        }
    };

    emit(&records, &args.query, &args.output)
}
