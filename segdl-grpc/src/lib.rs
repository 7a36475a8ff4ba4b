//! gRPC surface of the segmented downloader: the `FileDownloader` service that
//! plans and streams file segments, and the client that fetches them
//! concurrently and reassembles the file.

pub mod catalog;
pub mod proto;
pub mod status;
pub mod telemetry;

pub mod server;

pub mod client;

pub use client::orchestrator::{DownloadRequest, Orchestrator};
pub use client::progress::Progress;
pub use client::{Client, connect, file_info};
