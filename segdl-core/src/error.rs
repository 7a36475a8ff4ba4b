use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegdlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("segment {index} is out of range ({total} segments over {file_size} bytes)")]
    InvalidRange { index: u32, total: u32, file_size: u64 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("download cancelled")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SegdlError {
    /// True when the remote file is unknown or gone, as opposed to a broken transfer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SegdlError::NotFound(_))
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SegdlError>;
