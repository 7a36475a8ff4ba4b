pub mod fetcher;
pub mod orchestrator;
pub mod progress;

use crate::proto::FileInfoRequest;
use crate::proto::file_downloader_client::FileDownloaderClient;
use crate::status::{error_from_status, error_from_transport};
use segdl_core::RemoteFile;
use segdl_core::error::{Result, SegdlError};
use tonic::transport::{Channel, Endpoint};

pub type Client = FileDownloaderClient<Channel>;

/// Opens one HTTP/2 channel to `address`; every segment stream of a job is multiplexed on it.
///
/// `max_message_bytes` bounds a single decoded chunk and has to be at least the
/// server's chunk size.
pub async fn connect(address: &str, max_message_bytes: usize) -> Result<Client> {
    let endpoint = Endpoint::from_shared(address.to_string())
        .map_err(|e| SegdlError::InvalidArgument(format!("bad server address {address}: {e}")))?;
    let channel = endpoint.connect().await.map_err(error_from_transport)?;
    Ok(FileDownloaderClient::new(channel).max_decoding_message_size(max_message_bytes))
}

pub async fn file_info(client: &Client, path: &str) -> Result<RemoteFile> {
    let mut client = client.clone();
    let resp = client
        .get_file_info(FileInfoRequest {
            file_path: path.to_string(),
        })
        .await
        .map_err(error_from_status)?;
    Ok(resp.into_inner().into())
}
