//! HTTP transport seam.
//!
//! The fetcher and refresher only see [`Transport`]; production code uses
//! [`HttpTransport`] (reqwest), tests inject scripted implementations.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use url::Url;

use crate::error::Result;

/// Upper bound on the buffer reserved from an announced length.
const MAX_PREALLOC: u64 = 1 << 20;

/// Chunked response body. Each item is one chunk as received.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// Status line plus a streaming body.
pub struct TransportResponse {
    pub status: u16,
    /// Announced body length, if the server sent one.
    pub content_length: Option<u64>,
    pub body: BodyStream,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Drain the body into memory. Only used for small responses.
    pub async fn collect(mut self) -> Result<Vec<u8>> {
        let reserve = self.content_length.unwrap_or(0).min(MAX_PREALLOC) as usize;
        let mut buf = Vec::with_capacity(reserve);
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET. Connection-level failures are `TesskitError::Transport`;
    /// non-2xx statuses are returned, not raised.
    async fn get(&self, url: &Url, accept: Option<&str>) -> Result<TransportResponse>;
}
