pub mod service;
pub mod streamer;

use crate::catalog::{FileCatalog, prepare_root};
use crate::proto::file_downloader_server::FileDownloaderServer;
use crate::status::error_from_transport;
use http::HeaderName;
use segdl_core::config::ServerSettings;
use segdl_core::error::{Result, SegdlError};
use service::FileDownloadService;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::service::Routes;
use tonic::transport::Server;
use tonic_web::GrpcWebLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

const BANNER: &str =
    "Segmented file download server over gRPC. Use a gRPC client to connect.";

/// Builds the gRPC service over `settings.root_dir`, creating the root if needed.
pub fn build_service(
    settings: &ServerSettings,
    shutdown: CancellationToken,
) -> Result<FileDownloaderServer<FileDownloadService>> {
    prepare_root(&settings.root_dir, settings.seed_sample)?;
    let catalog = FileCatalog::open(&settings.root_dir)?;
    info!(root = %catalog.root().display(), "serving files");
    let service = FileDownloadService::new(catalog, settings.chunk_bytes, shutdown);
    Ok(FileDownloaderServer::new(service)
        .max_decoding_message_size(settings.max_message_bytes)
        .max_encoding_message_size(settings.max_message_bytes))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static("grpc-status"),
            HeaderName::from_static("grpc-message"),
            HeaderName::from_static("grpc-encoding"),
            HeaderName::from_static("grpc-accept-encoding"),
        ])
}

/// Serves on an already bound listener until `shutdown` is cancelled.
pub async fn serve_with_listener(
    settings: &ServerSettings,
    listener: TcpListener,
    shutdown: CancellationToken,
) -> Result<()> {
    let grpc = build_service(settings, shutdown.clone())?;
    let router = Routes::new(grpc)
        .into_axum_router()
        .route("/", axum::routing::get(|| async { BANNER }));

    Server::builder()
        .accept_http1(true)
        .layer(ServiceBuilder::new().layer(cors()).layer(GrpcWebLayer::new()))
        .add_routes(Routes::from(router))
        .serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            shutdown.cancelled_owned(),
        )
        .await
        .map_err(error_from_transport)?;

    info!("server stopped");
    Ok(())
}

pub async fn serve(settings: &ServerSettings, shutdown: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(&settings.listen)
        .await
        .map_err(|e| SegdlError::Config(format!("cannot listen on {}: {e}", settings.listen)))?;
    info!(addr = %settings.listen, "listening");
    serve_with_listener(settings, listener, shutdown).await
}
