pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use segdl_core::error::{Result, SegdlError};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Info {
            path,
            server,
            config,
        } => handlers::handle_info(path, server, config).await,
        Commands::Get {
            path,
            segments,
            segment_size_mb,
            out_dir,
            server,
            config,
            force,
        } => {
            handlers::handle_get(
                path,
                segments,
                segment_size_mb,
                out_dir,
                server,
                config,
                force,
            )
            .await
        }
    }
}

/// One-line message for the terminal; lookups and transfers fail differently.
pub fn describe(err: &SegdlError) -> String {
    match err {
        SegdlError::NotFound(msg) => format!("file not found: {msg}"),
        SegdlError::Transport(msg) => format!("transfer interrupted: {msg}"),
        SegdlError::Cancelled => "transfer interrupted: cancelled".to_string(),
        SegdlError::Io(e) => format!("transfer interrupted: {e}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_distinguish_lookup_from_transfer() {
        assert!(describe(&SegdlError::NotFound("a.bin".into())).starts_with("file not found"));
        assert!(describe(&SegdlError::Transport("reset".into())).starts_with("transfer interrupted"));
        assert!(describe(&SegdlError::Cancelled).starts_with("transfer interrupted"));
        assert!(!describe(&SegdlError::Config("bad".into())).starts_with("transfer"));
    }
}
