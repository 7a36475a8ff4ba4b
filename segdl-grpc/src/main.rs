use segdl_core::config::{DEFAULT_CONFIG_FILE, Settings};
use segdl_core::error::Result;
use segdl_grpc::{server, telemetry};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init("info");

    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::load_or_default(&PathBuf::from(DEFAULT_CONFIG_FILE))?,
    };

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            on_signal.cancel();
        }
    });

    server::serve(&settings.server_settings, shutdown).await
}
