// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use url::Url;

use tesskit::config::TessdataConfig;
use tesskit::error::{Result, TesskitError};
use tesskit::transport::{Transport, TransportResponse};
use tesskit::AssetManager;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const TEST_BASE_URL: &str = "https://models.test/tessdata/";
pub const TEST_LISTING_URL: &str = "https://api.models.test/contents";

/// What the scripted transport should do after the last chunk.
#[derive(Clone, Debug, PartialEq)]
pub enum Ending {
    Complete,
    /// Fail with a transport error, like a connection reset.
    Reset,
    /// Never finish, like a stalled connection.
    Stall,
}

/// Transport that replays a canned response and records requests.
#[derive(Clone)]
pub struct ScriptedTransport {
    status: u16,
    content_length: Option<u64>,
    chunks: Vec<Vec<u8>>,
    ending: Ending,
    connect_error: Option<String>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl ScriptedTransport {
    /// 200 with the given chunks and a matching content length.
    pub fn ok(chunks: Vec<Vec<u8>>) -> Self {
        let total = chunks.iter().map(|c| c.len() as u64).sum();
        Self {
            status: 200,
            content_length: Some(total),
            chunks,
            ending: Ending::Complete,
            connect_error: None,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok(vec![b"Not Found".to_vec()])
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            connect_error: Some(message.to_string()),
            ..Self::ok(Vec::new())
        }
    }

    pub fn with_content_length(mut self, length: Option<u64>) -> Self {
        self.content_length = length;
        self
    }

    pub fn with_ending(mut self, ending: Ending) -> Self {
        self.ending = ending;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url, accept: Option<&str>) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), accept.map(String::from)));

        if let Some(message) = &self.connect_error {
            return Err(TesskitError::Transport(message.clone()));
        }

        let chunks = stream::iter(
            self.chunks
                .clone()
                .into_iter()
                .map(|c| Ok::<Bytes, TesskitError>(Bytes::from(c))),
        );

        let body = match self.ending {
            Ending::Complete => chunks.boxed(),
            Ending::Reset => chunks
                .chain(stream::once(async {
                    Err(TesskitError::Transport("connection reset by peer".to_string()))
                }))
                .boxed(),
            Ending::Stall => chunks.chain(stream::pending()).boxed(),
        };

        Ok(TransportResponse {
            status: self.status,
            content_length: self.content_length,
            body,
        })
    }
}

pub fn test_config() -> TessdataConfig {
    TessdataConfig {
        base_url: TEST_BASE_URL.to_string(),
        listing_url: TEST_LISTING_URL.to_string(),
        ..TessdataConfig::default()
    }
}

pub fn manager_with(transport: &ScriptedTransport) -> AssetManager {
    AssetManager::new(Arc::new(transport.clone()), &test_config())
}

pub fn manager_with_staging(transport: &ScriptedTransport, staging: &Path) -> AssetManager {
    let config = TessdataConfig {
        staging_dir: Some(staging.to_path_buf()),
        ..test_config()
    };
    AssetManager::new(Arc::new(transport.clone()), &config)
}

/// Deterministic payload of `len` bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Names of every entry in `dir`, sorted. Empty if the dir is missing.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use tempfile;
pub use wiremock;
