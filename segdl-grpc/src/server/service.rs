use crate::catalog::FileCatalog;
use crate::proto::file_downloader_server::FileDownloader;
use crate::proto::{FileInfoRequest, FileInfoResponse, SegmentRequest, SegmentResponse};
use crate::server::streamer::stream_segment;
use crate::status::status_from;
use futures_core::Stream;
use segdl_core::plan::{hint_bytes, plan};
use std::pin::Pin;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::info;

pub type SegmentStream = Pin<Box<dyn Stream<Item = Result<SegmentResponse, Status>> + Send>>;

#[derive(Clone)]
pub struct FileDownloadService {
    catalog: FileCatalog,
    chunk_bytes: usize,
    shutdown: CancellationToken,
}

impl FileDownloadService {
    pub fn new(catalog: FileCatalog, chunk_bytes: usize, shutdown: CancellationToken) -> Self {
        Self {
            catalog,
            chunk_bytes,
            shutdown,
        }
    }
}

#[tonic::async_trait]
impl FileDownloader for FileDownloadService {
    async fn get_file_info(
        &self,
        request: Request<FileInfoRequest>,
    ) -> Result<Response<FileInfoResponse>, Status> {
        let req = request.into_inner();
        info!(path = %req.file_path, "file info requested");
        let file = self.catalog.lookup(&req.file_path).map_err(status_from)?;
        Ok(Response::new(file.into()))
    }

    type DownloadSegmentStream = SegmentStream;

    async fn download_segment(
        &self,
        request: Request<SegmentRequest>,
    ) -> Result<Response<Self::DownloadSegmentStream>, Status> {
        let req = request.into_inner();
        info!(
            file_id = %req.file_id,
            segment = req.segment_index,
            total = req.total_segments,
            segment_size_mb = req.segment_size_mb,
            "segment requested"
        );

        let (path, file_size) = self.catalog.resolve(&req.file_id).map_err(status_from)?;

        if req.total_segments <= 0 {
            return Err(Status::invalid_argument("total_segments must be positive"));
        }
        if req.segment_index < 0 || req.segment_index >= req.total_segments {
            return Err(Status::invalid_argument(format!(
                "segment index {} out of range 0..{}",
                req.segment_index, req.total_segments
            )));
        }

        let plan = plan(
            file_size,
            req.segment_index as u32,
            req.total_segments as u32,
            hint_bytes(req.segment_size_mb),
        )
        .map_err(status_from)?;

        let chunks = stream_segment(plan, path, self.chunk_bytes, self.shutdown.child_token());
        let out = chunks.map(|item| item.map(SegmentResponse::from).map_err(status_from));
        Ok(Response::new(Box::pin(out)))
    }
}
