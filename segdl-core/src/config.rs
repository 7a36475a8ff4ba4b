use crate::error::{Result, SegdlError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "appsettings.json";
pub const DEFAULT_SEGMENT_SIZE_MB: u32 = 5;
pub const DEFAULT_CHUNK_BYTES: usize = 64 * 1024;
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub download_settings: DownloadSettings,
    pub server_settings: ServerSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DownloadSettings {
    /// Fixed segment size requested from the server; 0 means split evenly.
    #[serde(rename = "SegmentSizeMB")]
    pub segment_size_mb: u32,
    pub server_address: String,
    pub output_dir: PathBuf,
    pub max_segments: u32,
    /// Largest gRPC message the client decodes; must cover the server's `ChunkBytes`.
    pub max_message_bytes: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            segment_size_mb: DEFAULT_SEGMENT_SIZE_MB,
            server_address: "http://localhost:5000".into(),
            output_dir: PathBuf::from("DownloadedFiles"),
            max_segments: 16,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerSettings {
    pub listen: String,
    pub root_dir: PathBuf,
    pub chunk_bytes: usize,
    pub max_message_bytes: usize,
    /// Create the root with a 1 MiB `sample.txt` when it does not exist yet.
    pub seed_sample: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:5000".into(),
            root_dir: PathBuf::from("DownloadFiles"),
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            seed_sample: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SegdlError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| SegdlError::Config(format!("{}: {e}", path.display())))
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
