//! Wire messages of the `filedownload.FileDownloader` service.
//!
//! Field tags are fixed; they match the protobuf schema used by non-Rust clients.

use segdl_core::{RemoteFile, SegmentChunk};

#[derive(Clone, PartialEq, prost::Message)]
pub struct FileInfoRequest {
    #[prost(string, tag = "1")]
    pub file_path: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FileInfoResponse {
    #[prost(string, tag = "1")]
    pub file_id: String,
    #[prost(string, tag = "2")]
    pub file_name: String,
    #[prost(int64, tag = "3")]
    pub file_size: i64,
    #[prost(string, tag = "4")]
    pub content_type: String,
    #[prost(int32, tag = "5")]
    pub recommended_segments: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SegmentRequest {
    #[prost(string, tag = "1")]
    pub file_id: String,
    #[prost(int32, tag = "2")]
    pub segment_index: i32,
    #[prost(int32, tag = "3")]
    pub total_segments: i32,
    /// Fixed segment size in MiB; `<= 0` asks for an even split.
    #[prost(int32, tag = "4")]
    pub segment_size_mb: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SegmentResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
    #[prost(int32, tag = "2")]
    pub segment_index: i32,
    #[prost(int32, tag = "3")]
    pub total_segments: i32,
    #[prost(int64, tag = "4")]
    pub offset: i64,
    #[prost(int32, tag = "5")]
    pub length: i32,
}

include!(concat!(env!("OUT_DIR"), "/filedownload.FileDownloader.rs"));

impl From<RemoteFile> for FileInfoResponse {
    fn from(f: RemoteFile) -> Self {
        Self {
            file_id: f.file_id,
            file_name: f.file_name,
            file_size: f.file_size as i64,
            content_type: f.content_type,
            recommended_segments: f.recommended_segments as i32,
        }
    }
}

impl From<FileInfoResponse> for RemoteFile {
    fn from(r: FileInfoResponse) -> Self {
        Self {
            file_id: r.file_id,
            file_name: r.file_name,
            file_size: r.file_size.max(0) as u64,
            content_type: r.content_type,
            recommended_segments: r.recommended_segments.max(1) as u32,
        }
    }
}

impl From<SegmentChunk> for SegmentResponse {
    fn from(c: SegmentChunk) -> Self {
        Self {
            length: c.data.len() as i32,
            segment_index: c.index as i32,
            total_segments: c.total_segments as i32,
            offset: c.offset as i64,
            data: c.data,
        }
    }
}
