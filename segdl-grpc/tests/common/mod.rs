#![allow(dead_code)]

use segdl_core::config::ServerSettings;
use segdl_grpc::{Client, connect, server};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    max_message_bytes: usize,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(64 * 1024, 16 * 1024 * 1024).await
    }

    pub async fn start_with(chunk_bytes: usize, max_message_bytes: usize) -> Self {
        let root = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let settings = ServerSettings {
            listen: addr.to_string(),
            root_dir: root.path().to_path_buf(),
            chunk_bytes,
            max_message_bytes,
            seed_sample: false,
            ..Default::default()
        };
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::spawn(async move { server::serve_with_listener(&settings, listener, token).await });
        Self {
            addr,
            root,
            max_message_bytes,
            shutdown,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn client(&self) -> Client {
        connect(&self.url(), self.max_message_bytes).await.unwrap()
    }

    /// Cancels the server's shutdown token, as Ctrl-C does for the binary.
    pub fn shut_down(&self) {
        self.shutdown.cancel();
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Deterministic, non-repeating-per-chunk test content.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i.wrapping_mul(31) ^ (i >> 11)) as u8)
        .collect()
}

pub fn entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}
