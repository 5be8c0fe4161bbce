//! Multi-page accumulation over a single-page fetch.

use async_trait::async_trait;
use rapiddns_core::{Record, RapidDnsError, RecordSet, Result};
use tracing::{debug, info, warn};

/// Anything that can fetch one page of records
#[async_trait]
pub trait PageSource: Sync {
    /// Fetch page `page` (1-indexed) holding at most `page_size` records
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<RecordSet>;
}

/// Progress reported after each page is accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// Page number just fetched
    pub page: u32,
    /// Records that page contributed
    pub page_records: usize,
    /// Records accumulated so far (after truncation)
    pub accumulated: usize,
}

/// A page that failed after earlier pages succeeded
#[derive(Debug)]
pub struct PageFailure {
    /// Page number that failed
    pub page: u32,
    /// The fetch error
    pub error: RapidDnsError,
}

/// Accumulated result of a paginated fetch
#[derive(Debug)]
pub struct Paginated {
    /// Records in page order, then within-page order
    pub records: RecordSet,
    /// Number of pages that returned successfully
    pub pages: u32,
    /// Set when fetching stopped early on an error; `records` is then partial
    pub interrupted: Option<PageFailure>,
}

/// Sequential paginator.
///
/// Pages are requested one at a time starting at `start_page`. Fetching stops
/// on an empty page, when `max_records` is reached (the result is truncated to
/// exactly that many), or when a page returns fewer than `page_size` records.
/// A failure on the first page is returned as an error; a later failure ends
/// the run with the records gathered so far.
#[derive(Debug, Clone)]
pub struct Paginator {
    /// First page to request
    pub start_page: u32,
    /// Records requested per page
    pub page_size: u32,
    /// Upper bound on accumulated records
    pub max_records: Option<usize>,
}

impl Paginator {
    /// Drive `source` until a stop condition is met
    pub async fn run<S, F>(&self, source: &S, mut on_page: F) -> Result<Paginated>
    where
        S: PageSource + ?Sized,
        F: FnMut(&PageProgress) + Send,
    {
        let mut records: Vec<Record> = Vec::new();
        let mut page = self.start_page;
        let mut pages = 0;
        let mut interrupted = None;

        loop {
            debug!(page, page_size = self.page_size, "fetching page");
            let batch = match source.fetch_page(page, self.page_size).await {
                Ok(batch) => batch,
                Err(error) if records.is_empty() => return Err(error),
                Err(error) => {
                    warn!(page, error = %error, "stopping pagination, keeping partial results");
                    interrupted = Some(PageFailure { page, error });
                    break;
                }
            };
            pages += 1;

            let page_records = batch.len();
            if page_records == 0 {
                break;
            }
            records.extend(batch.records);

            let capped = self.max_records.is_some_and(|max| records.len() >= max);
            if let Some(max) = self.max_records {
                records.truncate(max);
            }

            on_page(&PageProgress {
                page,
                page_records,
                accumulated: records.len(),
            });

            if capped || page_records < self.page_size as usize {
                break;
            }
            page += 1;
        }

        info!(pages, records = records.len(), "pagination finished");
        Ok(Paginated {
            records: RecordSet::from_records("ok", records),
            pages,
            interrupted,
        })
    }
}
