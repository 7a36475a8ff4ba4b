//! Client-side job driver: fan out one fetch per segment, aggregate progress,
//! then merge the sinks in index order.
//!
//! ```text
//! Planning ──► Fetching ──► Merging ──► Done
//!                 │            │
//!                 └────────────┴──► Failed
//! ```
//!
//! Any fetch failure (or cancellation of the caller's token) cancels the
//! remaining fetches, waits for them to wind down, deletes every sink and
//! leaves no destination file behind.

use crate::client::Client;
use crate::client::fetcher::SegmentFetcher;
use crate::client::progress::{Progress, ProgressTracker, monitor};
use segdl_core::error::{Result, SegdlError};
use segdl_core::{Completion, DownloadJob, JobState, merge, remove_sinks};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct DownloadRequest {
    pub file_id: String,
    pub total_segments: u32,
    pub file_size: u64,
    pub destination: PathBuf,
}

pub struct Orchestrator {
    client: Client,
    segment_size_mb: u32,
    progress: watch::Sender<Progress>,
}

impl Orchestrator {
    pub fn new(client: Client, segment_size_mb: u32) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            client,
            segment_size_mb,
            progress,
        }
    }

    /// Progress of the current (or last) job.
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    fn set_state(&self, state: JobState) {
        debug!(?state, "job state");
        self.progress.send_modify(|p| p.state = state);
    }

    pub async fn download(
        &self,
        request: DownloadRequest,
        cancel: CancellationToken,
    ) -> Result<Completion> {
        let started = Instant::now();
        self.progress.send_replace(Progress {
            state: JobState::Planning,
            bytes_written: 0,
            total_bytes: request.file_size,
        });

        let mut job = match self.plan(&request) {
            Ok(job) => job,
            Err(e) => {
                self.set_state(JobState::Failed);
                return Err(e);
            }
        };

        self.set_state(JobState::Fetching);
        info!(
            file_id = %job.file_id,
            segments = job.total_segments,
            bytes = job.total_bytes_expected,
            "download started"
        );
        if let Err(e) = self.fetch_all(&mut job, &cancel).await {
            self.fail(&job);
            return Err(e);
        }

        self.set_state(JobState::Merging);
        let sinks = job.sinks.clone();
        let destination = job.destination.clone();
        let merged = tokio::task::spawn_blocking(move || merge(&sinks, &destination))
            .await
            .map_err(|e| SegdlError::Internal(format!("merge task: {e}")))
            .and_then(|r| r);
        let bytes = match merged {
            Ok(bytes) => bytes,
            Err(e) => {
                self.fail(&job);
                return Err(e);
            }
        };

        self.set_state(JobState::Done);
        let completion = Completion {
            destination: job.destination,
            segments: job.total_segments,
            bytes,
            elapsed: started.elapsed(),
        };
        info!(
            bytes,
            elapsed_ms = completion.elapsed.as_millis() as u64,
            "download complete"
        );
        Ok(completion)
    }

    fn plan(&self, request: &DownloadRequest) -> Result<DownloadJob> {
        let job = DownloadJob::new(
            request.file_id.clone(),
            request.total_segments,
            request.file_size,
            &request.destination,
        )?;
        if job.destination.exists() {
            return Err(SegdlError::InvalidArgument(format!(
                "destination already exists: {}",
                job.destination.display()
            )));
        }
        // fetches truncate sinks and merge deletes them
        if let Some(taken) = job.sinks.iter().find(|s| s.exists()) {
            return Err(SegdlError::InvalidArgument(format!(
                "segment file already exists: {}",
                taken.display()
            )));
        }
        Ok(job)
    }

    async fn fetch_all(&self, job: &mut DownloadJob, cancel: &CancellationToken) -> Result<()> {
        let scope = cancel.child_token();
        let fetcher = Arc::new(SegmentFetcher::new(
            self.client.clone(),
            job.file_id.clone(),
            self.segment_size_mb,
        ));
        let (events, rx) = mpsc::unbounded_channel();
        let watcher = tokio::spawn(monitor(
            rx,
            ProgressTracker::new(job.total_segments),
            self.progress.clone(),
        ));

        let mut tasks = JoinSet::new();
        for (index, sink) in job.sinks.iter().cloned().enumerate() {
            let index = index as u32;
            let total = job.total_segments;
            let fetcher = Arc::clone(&fetcher);
            let events = events.clone();
            let scope = scope.clone();
            tasks.spawn(async move {
                let r = fetcher.fetch(index, total, &sink, &events, &scope).await;
                (index, r)
            });
        }
        drop(events);

        let mut failure: Option<SegdlError> = None;
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    if failure.is_none() {
                        failure = Some(SegdlError::Internal(format!("fetch task: {e}")));
                    }
                    scope.cancel();
                    continue;
                }
            };
            match result {
                Ok(bytes) => debug!(segment = index, bytes, "segment done"),
                Err(e) => {
                    if failure.is_none() {
                        if !matches!(e, SegdlError::Cancelled) {
                            warn!(segment = index, error = %e, "segment failed, aborting job");
                        }
                        failure = Some(e);
                    }
                    scope.cancel();
                }
            }
        }

        let tracker = watcher
            .await
            .map_err(|e| SegdlError::Internal(format!("progress monitor: {e}")))?;
        job.bytes_written_per_segment = tracker.into_per_segment();

        match failure {
            Some(e) => Err(e),
            // a cancelled job never reaches the merge
            None if cancel.is_cancelled() => Err(SegdlError::Cancelled),
            None => Ok(()),
        }
    }

    fn fail(&self, job: &DownloadJob) {
        let removed = remove_sinks(&job.sinks);
        warn!(
            file_id = %job.file_id,
            removed_sinks = removed,
            bytes_discarded = job.bytes_written(),
            "download failed"
        );
        self.set_state(JobState::Failed);
    }
}
