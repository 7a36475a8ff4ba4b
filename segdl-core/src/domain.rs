// segdl_core/src/domain.rs

/// Metadata returned by a file lookup on the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteFile {
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub content_type: String,
    pub recommended_segments: u32,
}

/// One bounded piece of a segment as it travels over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentChunk {
    pub index: u32,
    pub total_segments: u32,
    /// Absolute file offset of `data[0]`.
    pub offset: u64,
    pub data: Vec<u8>,
}

impl SegmentChunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}
