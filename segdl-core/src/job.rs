use crate::error::{Result, SegdlError};
use crate::merge::sink_path;
use std::path::{Path, PathBuf};

/// Lifecycle of a client-side download.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JobState {
    #[default]
    Planning,
    Fetching,
    Merging,
    Done,
    Failed,
}

/// In-memory bookkeeping for one download; each sink belongs to exactly one fetch.
#[derive(Clone, Debug)]
pub struct DownloadJob {
    pub file_id: String,
    pub total_segments: u32,
    pub destination: PathBuf,
    pub sinks: Vec<PathBuf>,
    pub total_bytes_expected: u64,
    pub bytes_written_per_segment: Vec<u64>,
}

impl DownloadJob {
    pub fn new(
        file_id: impl Into<String>,
        total_segments: u32,
        file_size: u64,
        destination: &Path,
    ) -> Result<Self> {
        if total_segments == 0 {
            return Err(SegdlError::InvalidArgument(
                "segment count must be at least 1".into(),
            ));
        }
        let sinks = (0..total_segments)
            .map(|i| sink_path(destination, i))
            .collect();
        Ok(Self {
            file_id: file_id.into(),
            total_segments,
            destination: destination.to_path_buf(),
            sinks,
            total_bytes_expected: file_size,
            bytes_written_per_segment: vec![0; total_segments as usize],
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written_per_segment.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_one_sink_per_segment() {
        let job = DownloadJob::new("id", 3, 99, Path::new("out/data.bin")).unwrap();
        assert_eq!(
            job.sinks,
            vec![
                PathBuf::from("out/data.bin.part0"),
                PathBuf::from("out/data.bin.part1"),
                PathBuf::from("out/data.bin.part2"),
            ]
        );
        assert_eq!(job.bytes_written_per_segment, vec![0, 0, 0]);
        assert_eq!(job.bytes_written(), 0);
    }

    #[test]
    fn zero_segments_is_rejected() {
        assert!(matches!(
            DownloadJob::new("id", 0, 10, Path::new("x")),
            Err(SegdlError::InvalidArgument(_))
        ));
    }
}
