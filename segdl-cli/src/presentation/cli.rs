use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "segdl: segmented gRPC file downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show name, size, content type and recommended segments of a remote file
    Info {
        /// path relative to the server's download root
        path: String,

        /// server address (overrides DownloadSettings.ServerAddress)
        #[arg(long)]
        server: Option<String>,

        /// settings file
        #[arg(long, default_value = "appsettings.json")]
        config: PathBuf,
    },

    /// Download a remote file over parallel segment streams
    Get {
        path: String,

        /// number of parallel segments; out of range falls back to the recommendation
        #[arg(long)]
        segments: Option<u32>,

        /// fixed segment size in MiB, 0 splits evenly (overrides DownloadSettings.SegmentSizeMB)
        #[arg(long = "segment-size-mb")]
        segment_size_mb: Option<u32>,

        /// directory the file is saved into
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,

        #[arg(long)]
        server: Option<String>,

        #[arg(long, default_value = "appsettings.json")]
        config: PathBuf,

        /// replace an existing file at the destination
        #[arg(long)]
        force: bool,
    },
}
