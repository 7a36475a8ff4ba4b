use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a finished download, used for throughput reporting.
#[derive(Clone, Debug)]
pub struct Completion {
    pub destination: PathBuf,
    pub segments: u32,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl Completion {
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return self.bytes as f64;
        }
        self.bytes as f64 / secs
    }
}
