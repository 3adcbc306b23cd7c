//! Fetch-and-install of a single language asset.
//!
//! Bytes are streamed into a private temporary file and only published into
//! the installation directory by an atomic, no-clobber rename once the whole
//! body has arrived. A failed, short, or cancelled transfer drops the
//! temporary file and never touches the published path.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tempfile::{NamedTempFile, PersistError};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::catalog::{is_valid_code, LanguageAsset};
use crate::error::{Result, TesskitError};
use crate::progress::{ProgressFn, ProgressTracker};
use crate::store;
use crate::transport::{Transport, TransportResponse};

pub struct Fetcher {
    transport: Arc<dyn Transport>,
    base_url: String,
    staging_dir: Option<PathBuf>,
}

impl Fetcher {
    /// `base_url` is the origin the file name is appended to; a trailing
    /// slash is added when missing. It is only parsed at fetch time.
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        staging_dir: Option<PathBuf>,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            transport,
            base_url,
            staging_dir,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}{code}.traineddata`
    pub fn remote_url(&self, asset: &LanguageAsset) -> Result<Url> {
        if !is_valid_code(&asset.code) {
            return Err(TesskitError::BadRemoteAddress(format!(
                "'{}' is not a valid language code",
                asset.code
            )));
        }

        let base = Url::parse(&self.base_url)?;
        Ok(base.join(&asset.file_name())?)
    }

    /// Ensure `dir/<code>.traineddata` exists, downloading it if absent.
    ///
    /// Returns the published path. Progress is reported only when the server
    /// announces a positive content length.
    pub async fn fetch(
        &self,
        asset: &LanguageAsset,
        dir: &Path,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<PathBuf> {
        let url = self.remote_url(asset)?;
        let target = store::asset_path(asset, dir);

        if store::exists(asset, dir) {
            debug!(code = %asset.code, path = %target.display(), "Language asset already installed");
            return Ok(target);
        }

        info!(code = %asset.code, url = %url, "Downloading language asset");
        let response = self.transport.get(&url, None).await?;
        if !response.is_success() {
            return Err(TesskitError::Server(response.status));
        }

        let (staged, received) = self.stage(asset, response, on_progress).await?;

        tokio::fs::create_dir_all(dir).await?;
        if publish(staged, dir, &target)? {
            info!(code = %asset.code, bytes = received, path = %target.display(), "Language asset installed");
        } else {
            debug!(code = %asset.code, "Language asset published concurrently, discarding download");
        }

        Ok(target)
    }

    fn temp_file(&self, asset: &LanguageAsset) -> io::Result<NamedTempFile> {
        let prefix = format!(".{}-", asset.code);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".part");

        match &self.staging_dir {
            Some(staging) => builder.tempfile_in(staging),
            None => builder.tempfile(),
        }
    }

    async fn stage(
        &self,
        asset: &LanguageAsset,
        response: TransportResponse,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<(NamedTempFile, u64)> {
        let temp = self.temp_file(asset)?;
        let mut file = tokio::fs::File::from_std(temp.as_file().try_clone()?);
        let mut tracker = ProgressTracker::new(response.content_length);
        let mut body = response.body;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }

            file.write_all(&chunk).await?;

            if let (Some(fraction), Some(report)) = (tracker.advance(chunk.len()), on_progress) {
                report(fraction);
            }
        }

        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Some(total) = tracker.total() {
            if tracker.received() < total {
                return Err(TesskitError::Transport(format!(
                    "body ended after {} of {} bytes",
                    tracker.received(),
                    total
                )));
            }
        }

        debug!(code = %asset.code, bytes = tracker.received(), temp = %temp.path().display(), "Download staged");
        Ok((temp, tracker.received()))
    }
}

/// Atomically move `staged` to `target` without replacing an existing file.
///
/// Returns `false` when another writer published the target first; the
/// staged copy is then discarded. Staging on another filesystem falls back
/// to copying into a sibling temp file inside `dir` and renaming that.
fn publish(staged: NamedTempFile, dir: &Path, target: &Path) -> Result<bool> {
    let staged = match staged.persist_noclobber(target) {
        Ok(_) => return Ok(true),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(PersistError { error, file }) => {
            debug!(error = %error, "Direct publish failed, copying into place");
            file
        }
    };

    let mut sibling = tempfile::Builder::new()
        .prefix(".publish-")
        .suffix(".part")
        .tempfile_in(dir)?;
    let mut source = staged.reopen()?;
    io::copy(&mut source, sibling.as_file_mut())?;
    sibling.as_file().sync_all()?;

    match sibling.persist_noclobber(target) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}
