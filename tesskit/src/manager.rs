//! Asset manager facade.
//!
//! Composes catalog lookup, the fetcher, the scanner and the remote
//! refresher behind one caller-constructed value. There is no process-wide
//! instance; the transport is injected at construction.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::catalog::{self, LanguageAsset};
use crate::config::TessdataConfig;
use crate::error::{Result, TesskitError};
use crate::fetcher::Fetcher;
use crate::progress::ProgressFn;
use crate::refresh::CatalogRefresher;
use crate::store;
use crate::transport::{HttpTransport, Transport};

pub struct AssetManager {
    fetcher: Fetcher,
    refresher: CatalogRefresher,
}

impl AssetManager {
    pub fn new(transport: Arc<dyn Transport>, config: &TessdataConfig) -> Self {
        Self {
            fetcher: Fetcher::new(
                Arc::clone(&transport),
                config.base_url.clone(),
                config.staging_dir.clone(),
            ),
            refresher: CatalogRefresher::new(transport, config.listing_url.clone()),
        }
    }

    /// Manager backed by a reqwest client built from `config`.
    pub fn from_config(config: &TessdataConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Make `code` available in `dir`, downloading it if absent.
    ///
    /// Unknown codes fail with [`TesskitError::UnknownLanguage`] before any
    /// network activity.
    pub async fn ensure_available(
        &self,
        code: &str,
        dir: &Path,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<PathBuf> {
        let asset = catalog::lookup(code)
            .ok_or_else(|| TesskitError::UnknownLanguage(code.to_string()))?;
        self.fetcher.fetch(&asset, dir, on_progress).await
    }

    /// Ensure several languages concurrently, one independent fetch each.
    /// Results are returned in input order.
    pub async fn ensure_many(
        &self,
        codes: &[String],
        dir: &Path,
    ) -> Vec<(String, Result<PathBuf>)> {
        let fetches = codes.iter().map(|code| async move {
            let result = self.ensure_available(code, dir, None).await;
            (code.clone(), result)
        });
        join_all(fetches).await
    }

    pub async fn fetch(
        &self,
        asset: &LanguageAsset,
        dir: &Path,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<PathBuf> {
        self.fetcher.fetch(asset, dir, on_progress).await
    }

    pub fn exists(&self, asset: &LanguageAsset, dir: &Path) -> bool {
        store::exists(asset, dir)
    }

    pub fn list_installed(&self, dir: &Path) -> BTreeSet<String> {
        store::list_installed(dir)
    }

    pub fn delete(&self, asset: &LanguageAsset, dir: &Path) -> Result<()> {
        store::delete(asset, dir)
    }

    pub async fn refresh_catalog(&self) -> Result<Vec<LanguageAsset>> {
        self.refresher.refresh_catalog().await
    }

    /// Remote listing when reachable, the static catalog otherwise.
    pub async fn refresh_or_fallback(&self) -> Vec<LanguageAsset> {
        match self.refresher.refresh_catalog().await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "Remote catalog unavailable, using built-in catalog");
                catalog::all_known_assets()
            }
        }
    }
}
