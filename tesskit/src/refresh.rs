//! Remote catalog refresh from the repository listing API.
//!
//! Online-only and best effort: the result carries real file sizes but the
//! static catalog stays the fallback and is never modified.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::catalog::{by_display_name, display_name, LanguageAsset, ASSET_SUFFIX};
use crate::error::{Result, TesskitError};
use crate::transport::Transport;

pub const LISTING_ACCEPT: &str = "application/vnd.github.v3+json";

/// One entry of the listing response. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    size: u64,
}

pub struct CatalogRefresher {
    transport: Arc<dyn Transport>,
    listing_url: String,
}

impl CatalogRefresher {
    pub fn new(transport: Arc<dyn Transport>, listing_url: impl Into<String>) -> Self {
        Self {
            transport,
            listing_url: listing_url.into(),
        }
    }

    pub async fn refresh_catalog(&self) -> Result<Vec<LanguageAsset>> {
        let url = Url::parse(&self.listing_url)?;

        let response = self.transport.get(&url, Some(LISTING_ACCEPT)).await?;
        if !response.is_success() {
            return Err(TesskitError::Server(response.status));
        }

        let body = response.collect().await?;
        let assets = parse_listing(&body)?;
        debug!(count = assets.len(), url = %url, "Fetched remote language listing");
        Ok(assets)
    }
}

/// Decode a listing body into assets sorted by display name.
pub fn parse_listing(body: &[u8]) -> Result<Vec<LanguageAsset>> {
    let entries: Vec<ListingEntry> = serde_json::from_slice(body)?;

    let mut assets: Vec<LanguageAsset> = entries
        .into_iter()
        .filter_map(|entry| {
            let code = entry.name.strip_suffix(ASSET_SUFFIX)?;
            if code.is_empty() {
                return None;
            }
            let name = display_name(code).unwrap_or(code);
            Some(LanguageAsset::new(code, name).with_expected_size(entry.size))
        })
        .collect();

    assets.sort_by(by_display_name);
    Ok(assets)
}
