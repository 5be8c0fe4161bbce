//! Export workflow: submit, poll, download, decompress, parse.

use crate::archive::extract_zip;
use crate::config::PollConfig;
use crate::RapidDnsClient;
use chrono::{DateTime, Local};
use rapiddns_core::{ExportRequest, ExportTask, RapidDnsError, RecordSet, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default directory exports are written to
pub const DEFAULT_OUTPUT_DIR: &str = "result";

/// Receives export lifecycle events. Every method defaults to doing nothing.
pub trait ExportObserver: Send {
    /// The task was accepted by the server
    fn submitted(&mut self, _task_id: &str) {}

    /// A status read succeeded
    fn progress(&mut self, _task: &ExportTask) {}

    /// A status read failed and will be retried after `retry_in`
    fn poll_failed(&mut self, _error: &RapidDnsError, _retry_in: Duration) {}

    /// The download is starting
    fn downloading(&mut self, _url: &str, _dest: &Path) {}

    /// The download finished
    fn downloaded(&mut self, _path: &Path, _bytes: u64) {}

    /// Archive entries were extracted
    fn extracted(&mut self, _files: &[PathBuf]) {}
}

impl ExportObserver for () {}

/// Files and records produced by a finished export
#[derive(Debug)]
pub struct ExportOutcome {
    /// Server-side task identifier
    pub task_id: String,
    /// Downloaded file (ZIP or CSV)
    pub download_path: PathBuf,
    /// Files extracted from the archive, in archive order
    pub extracted: Vec<PathBuf>,
    /// The CSV the records were read from, if one was produced
    pub csv_path: Option<PathBuf>,
    /// Parsed records, when parsing was requested and a CSV was found
    pub records: Option<RecordSet>,
}

/// A configured export run.
///
/// Created by [`ExportApi::start`](crate::api::ExportApi::start).
pub struct ExportJob<'a> {
    client: &'a RapidDnsClient,
    request: ExportRequest,
    output_dir: PathBuf,
    poll: PollConfig,
    parse_records: bool,
}

impl<'a> ExportJob<'a> {
    pub(crate) fn new(client: &'a RapidDnsClient, request: ExportRequest) -> Self {
        Self {
            client,
            request,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            poll: client.poll_config().clone(),
            parse_records: false,
        }
    }

    /// Directory the download (and extracted files) are written to
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override the client's polling configuration
    #[must_use]
    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Parse the resulting CSV into a [`RecordSet`]
    #[must_use]
    pub const fn parse_records(mut self, parse: bool) -> Self {
        self.parse_records = parse;
        self
    }

    /// Run the workflow to completion
    pub async fn run<O>(self, observer: &mut O) -> Result<ExportOutcome>
    where
        O: ExportObserver + ?Sized,
    {
        let api = self.client.export();

        let task_id = api.submit(&self.request).await?;
        observer.submitted(&task_id);

        let task = api
            .wait_for_completion(&task_id, &self.poll, observer)
            .await?;
        let url = task
            .download_url()
            .ok_or_else(|| RapidDnsError::MissingDownloadUrl {
                task_id: task_id.clone(),
            })?
            .to_string();

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let file_name = download_file_name(
            &url,
            &self.request.query_input,
            self.request.compress,
            Local::now(),
        );
        let download_path = self.output_dir.join(file_name);

        observer.downloading(&url, &download_path);
        let bytes = api.download(&url, &download_path).await?;
        info!(path = %download_path.display(), bytes, "export downloaded");
        observer.downloaded(&download_path, bytes);

        let extracted = if self.request.compress && has_extension(&download_path, "zip") {
            let archive = download_path.clone();
            let dest = self.output_dir.clone();
            let files = tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
                .await
                .map_err(std::io::Error::other)??;
            observer.extracted(&files);
            files
        } else {
            Vec::new()
        };

        let csv_path = pick_csv(&download_path, &extracted);
        let records = match (&csv_path, self.parse_records) {
            (Some(path), true) => {
                debug!(path = %path.display(), "parsing export CSV");
                let path = path.clone();
                let set = tokio::task::spawn_blocking(move || RecordSet::from_csv_path(path))
                    .await
                    .map_err(std::io::Error::other)??;
                Some(set)
            }
            _ => None,
        };

        Ok(ExportOutcome {
            task_id,
            download_path,
            extracted,
            csv_path,
            records,
        })
    }
}

/// File name for a download: the URL's last path segment, or a timestamped fallback
#[must_use]
pub fn download_file_name(url: &str, query_input: &str, compress: bool, now: DateTime<Local>) -> String {
    let from_url = Url::parse(url)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(url)))
        .ok()
        .and_then(|u| u.path_segments()?.last().map(str::to_string))
        .filter(|name| !name.is_empty());
    if let Some(name) = from_url {
        return name;
    }

    let safe_input: String = query_input
        .chars()
        .map(|c| if matches!(c, ':' | '/' | '\\') { '_' } else { c })
        .collect();
    let ext = if compress { "zip" } else { "csv" };
    format!(
        "rapiddns_export_{safe_input}_{}.{ext}",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// The CSV to read records from: the download itself, or the last extracted CSV
#[must_use]
pub fn pick_csv(download: &Path, extracted: &[PathBuf]) -> Option<PathBuf> {
    if has_extension(download, "csv") {
        return Some(download.to_path_buf());
    }
    extracted
        .iter()
        .rev()
        .find(|p| has_extension(p, "csv"))
        .cloned()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
