use segdl_core::error::{Result, SegdlError};
use segdl_core::{SegmentChunk, SegmentPlan};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Chunks buffered ahead of the transport before the reader waits.
const CHANNEL_DEPTH: usize = 4;

/// Streams the bytes of `plan` from `path` as chunks of at most `chunk_bytes`.
///
/// The file is read by a spawned task; the stream ends after `plan.length`
/// bytes or at an early end of file. Dropping the stream stops the reader,
/// and cancelling `cancel` ends the stream with [`SegdlError::Cancelled`].
/// Read failures are delivered as the last item.
pub fn stream_segment(
    plan: SegmentPlan,
    path: PathBuf,
    chunk_bytes: usize,
    cancel: CancellationToken,
) -> ReceiverStream<Result<SegmentChunk>> {
    spawn_reader(plan, path, chunk_bytes, cancel).0
}

fn spawn_reader(
    plan: SegmentPlan,
    path: PathBuf,
    chunk_bytes: usize,
    cancel: CancellationToken,
) -> (ReceiverStream<Result<SegmentChunk>>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    let reader = tokio::spawn(async move {
        match pump(&plan, &path, chunk_bytes.max(1), &cancel, &tx).await {
            Ok(()) => {}
            Err(SegdlError::Cancelled) => {
                debug!(segment = plan.index, "segment stream cancelled");
                let _ = tx.send(Err(SegdlError::Cancelled)).await;
            }
            Err(e) => {
                warn!(segment = plan.index, error = %e, "segment stream failed");
                let _ = tx.send(Err(e)).await;
            }
        }
    });
    (ReceiverStream::new(rx), reader)
}

async fn pump(
    plan: &SegmentPlan,
    path: &Path,
    chunk_bytes: usize,
    cancel: &CancellationToken,
    tx: &mpsc::Sender<Result<SegmentChunk>>,
) -> Result<()> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(plan.offset)).await?;

    let cap = (plan.length.min(chunk_bytes as u64) as usize).max(1);
    let mut buf = vec![0u8; cap];
    let mut sent = 0u64;

    while sent < plan.length {
        let want = (plan.length - sent).min(cap as u64) as usize;
        let n = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SegdlError::Cancelled),
            _ = tx.closed() => {
                debug!(segment = plan.index, sent, "receiver dropped");
                return Ok(());
            }
            r = file.read(&mut buf[..want]) => r?,
        };
        if n == 0 {
            // file shrank since planning; end the stream short
            debug!(segment = plan.index, sent, expected = plan.length, "early end of file");
            break;
        }

        let chunk = SegmentChunk {
            index: plan.index,
            total_segments: plan.total_segments,
            offset: plan.offset + sent,
            data: buf[..n].to_vec(),
        };
        sent += n as u64;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SegdlError::Cancelled),
            r = tx.send(Ok(chunk)) => {
                if r.is_err() {
                    debug!(segment = plan.index, sent, "receiver dropped");
                    return Ok(());
                }
            }
        }
    }

    info!(
        segment = plan.index,
        total = plan.total_segments,
        bytes = sent,
        "segment sent"
    );
    Ok(())
}
