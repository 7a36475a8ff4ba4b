use crate::client::Client;
use crate::client::progress::ProgressEvent;
use crate::proto::{SegmentRequest, SegmentResponse};
use crate::status::error_from_status;
use segdl_core::error::{Result, SegdlError};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Downloads single segments of one remote file into local sinks.
#[derive(Clone)]
pub struct SegmentFetcher {
    client: Client,
    file_id: String,
    segment_size_mb: u32,
}

impl SegmentFetcher {
    pub fn new(client: Client, file_id: impl Into<String>, segment_size_mb: u32) -> Self {
        Self {
            client,
            file_id: file_id.into(),
            segment_size_mb,
        }
    }

    /// Streams segment `index` of `total` into `sink`, returning the bytes written.
    ///
    /// Chunks are appended in arrival order; each must continue exactly where
    /// the previous one ended. Cancelling `cancel` drops the stream, which
    /// also ends the server side of the call.
    pub async fn fetch(
        &self,
        index: u32,
        total: u32,
        sink: &Path,
        progress: &mpsc::UnboundedSender<ProgressEvent>,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let request = SegmentRequest {
            file_id: self.file_id.clone(),
            segment_index: index as i32,
            total_segments: total as i32,
            segment_size_mb: self.segment_size_mb.min(i32::MAX as u32) as i32,
        };
        let mut client = self.client.clone();
        let mut stream = tokio::select! {
            _ = cancel.cancelled() => return Err(SegdlError::Cancelled),
            r = client.download_segment(request) => r.map_err(error_from_status)?.into_inner(),
        };

        let mut out = File::create(sink).await?;
        let mut next_offset: Option<u64> = None;
        let mut written = 0u64;

        loop {
            let msg = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SegdlError::Cancelled),
                m = stream.message() => m.map_err(error_from_status)?,
            };
            let Some(chunk) = msg else { break };
            let offset = check_chunk(&chunk, index, next_offset)?;

            out.write_all(&chunk.data).await?;
            let n = chunk.data.len() as u64;
            next_offset = Some(offset + n);
            written += n;
            // monitor gone means nobody is watching; the download itself goes on
            let _ = progress.send(ProgressEvent {
                segment: index,
                bytes: n,
            });
        }

        out.flush().await?;
        debug!(segment = index, total, bytes = written, "segment received");
        Ok(written)
    }
}

/// Validates one chunk against the segment being fetched and returns its offset.
fn check_chunk(chunk: &SegmentResponse, index: u32, expected: Option<u64>) -> Result<u64> {
    if chunk.segment_index != index as i32 {
        return Err(SegdlError::Transport(format!(
            "chunk for segment {} on stream of segment {index}",
            chunk.segment_index
        )));
    }
    if chunk.length < 0 || chunk.length as usize != chunk.data.len() {
        return Err(SegdlError::Transport(format!(
            "chunk length {} does not match {} data bytes",
            chunk.length,
            chunk.data.len()
        )));
    }
    let offset = u64::try_from(chunk.offset)
        .map_err(|_| SegdlError::Transport(format!("negative chunk offset {}", chunk.offset)))?;
    if let Some(want) = expected {
        if offset != want {
            return Err(SegdlError::Transport(format!(
                "segment {index}: expected chunk at offset {want}, got {offset}"
            )));
        }
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: i32, offset: i64, data: &[u8]) -> SegmentResponse {
        SegmentResponse {
            data: data.to_vec(),
            segment_index: index,
            total_segments: 4,
            offset,
            length: data.len() as i32,
        }
    }

    #[test]
    fn first_chunk_sets_baseline() {
        assert_eq!(check_chunk(&chunk(2, 500, b"abc"), 2, None).unwrap(), 500);
    }

    #[test]
    fn contiguous_chunk_is_accepted() {
        assert_eq!(check_chunk(&chunk(1, 503, b"x"), 1, Some(503)).unwrap(), 503);
    }

    #[test]
    fn gap_is_transport_failure() {
        assert!(matches!(
            check_chunk(&chunk(1, 600, b"x"), 1, Some(503)),
            Err(SegdlError::Transport(_))
        ));
    }

    #[test]
    fn wrong_segment_or_length_is_transport_failure() {
        assert!(check_chunk(&chunk(3, 0, b"x"), 1, None).is_err());
        let mut c = chunk(1, 0, b"abcd");
        c.length = 3;
        assert!(check_chunk(&c, 1, None).is_err());
        assert!(check_chunk(&chunk(1, -1, b"x"), 1, None).is_err());
    }
}
