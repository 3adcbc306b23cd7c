use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{
    header::{HeaderValue, ACCEPT},
    Client,
};
use url::Url;

use super::{Transport, TransportResponse};
use crate::config::TessdataConfig;
use crate::error::{Result, TesskitError};

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &TessdataConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| TesskitError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, accept: Option<&str>) -> Result<TransportResponse> {
        let mut request = self.client.get(url.clone());
        if let Some(accept) = accept {
            let value = HeaderValue::from_str(accept)
                .map_err(|e| TesskitError::BadRemoteAddress(format!("Invalid accept header: {e}")))?;
            request = request.header(ACCEPT, value);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TesskitError::from))
            .boxed();

        Ok(TransportResponse {
            status,
            content_length,
            body,
        })
    }
}
