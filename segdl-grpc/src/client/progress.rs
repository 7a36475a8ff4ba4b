use segdl_core::JobState;
use tokio::sync::{mpsc, watch};

/// Bytes written by one fetch since its previous event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub segment: u32,
    pub bytes: u64,
}

/// Aggregate view published to observers of a job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub state: JobState,
    pub bytes_written: u64,
    pub total_bytes: u64,
}

/// Per-segment counters; each slot is only ever advanced by its own segment's events.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    per_segment: Vec<u64>,
    total: u64,
}

impl ProgressTracker {
    pub fn new(segments: u32) -> Self {
        Self {
            per_segment: vec![0; segments as usize],
            total: 0,
        }
    }

    pub fn record(&mut self, ev: ProgressEvent) {
        if let Some(slot) = self.per_segment.get_mut(ev.segment as usize) {
            *slot += ev.bytes;
            self.total += ev.bytes;
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn into_per_segment(self) -> Vec<u64> {
        self.per_segment
    }
}

/// Drains fetch events until every sender is gone, publishing the running total.
pub async fn monitor(
    mut events: mpsc::UnboundedReceiver<ProgressEvent>,
    mut tracker: ProgressTracker,
    publish: watch::Sender<Progress>,
) -> ProgressTracker {
    while let Some(ev) = events.recv().await {
        tracker.record(ev);
        let total = tracker.total();
        publish.send_modify(|p| p.bytes_written = total);
    }
    tracker
}
