//! Bulk export endpoints.

use crate::config::PollConfig;
use crate::export::{ExportJob, ExportObserver};
use crate::RapidDnsClient;
use rapiddns_core::envelope::StatusRule;
use rapiddns_core::{
    ExportRequest, ExportState, ExportTask, ExportTicket, RapidDnsError, Result,
};
use std::path::Path;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Export API endpoints
pub struct ExportApi<'a> {
    client: &'a RapidDnsClient,
}

impl<'a> ExportApi<'a> {
    pub(crate) fn new(client: &'a RapidDnsClient) -> Self {
        Self { client }
    }

    /// Submit an export task, returning its identifier
    pub async fn submit(&self, request: &ExportRequest) -> Result<String> {
        let ticket: ExportTicket = self
            .client
            .post(&["export-data"], request, StatusRule::OkOnly)
            .await?;

        if ticket.export_id.is_empty() {
            return Err(RapidDnsError::MalformedResponse(
                "export submission returned no task id".into(),
            ));
        }
        info!(task_id = %ticket.export_id, query = %request.query_input, "export submitted");
        Ok(ticket.export_id)
    }

    /// Read the current state of an export task once
    pub async fn status(&self, task_id: &str) -> Result<ExportTask> {
        self.client
            .get(&["export-data", task_id], &[], StatusRule::OkOnly)
            .await
    }

    /// Stream a finished export to `dest`, returning the bytes written
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.client.download_to(url, dest).await
    }

    /// Poll a task until it completes.
    ///
    /// Failed status reads are retried after `poll.retry_backoff`; a task in
    /// the `failed` state ends polling with [`RapidDnsError::ExportFailed`].
    pub async fn wait_for_completion<O>(
        &self,
        task_id: &str,
        poll: &PollConfig,
        observer: &mut O,
    ) -> Result<ExportTask>
    where
        O: ExportObserver + ?Sized,
    {
        let started = Instant::now();

        loop {
            let wanted = match self.status(task_id).await {
                Ok(task) => {
                    debug!(task_id, status = %task.status, progress = task.progress_percent, "export status");
                    observer.progress(&task);
                    match task.state() {
                        ExportState::Completed => return Ok(task),
                        ExportState::Failed => {
                            return Err(RapidDnsError::ExportFailed {
                                task_id: task_id.to_string(),
                            })
                        }
                        _ => poll.interval,
                    }
                }
                Err(e) if e.is_transient() => {
                    warn!(task_id, error = %e, "export status read failed, retrying");
                    observer.poll_failed(&e, poll.retry_backoff);
                    poll.retry_backoff
                }
                Err(e) => return Err(e),
            };

            let waited = started.elapsed();
            match poll.next_delay(wanted, waited) {
                Some(delay) => sleep(delay).await,
                None => {
                    return Err(RapidDnsError::ExportTimeout {
                        task_id: task_id.to_string(),
                        waited,
                    })
                }
            }
        }
    }

    /// Prepare the full submit, poll, download and post-process workflow
    #[must_use]
    pub fn start(&self, request: ExportRequest) -> ExportJob<'a> {
        ExportJob::new(self.client, request)
    }
}
