//! Local installation directory: presence checks, scanning and deletion.
//!
//! The directory is owned by the caller and may be shared with other
//! processes. Presence of `<code>.traineddata` is the only state; there is
//! no manifest and no locking.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::{is_valid_code, LanguageAsset, ASSET_SUFFIX};
use crate::error::{Result, TesskitError};

/// Final published path of an asset inside `dir`.
pub fn asset_path(asset: &LanguageAsset, dir: &Path) -> PathBuf {
    dir.join(asset.file_name())
}

/// True iff the asset file exists as a regular file, following symlinks.
/// Size and content are not checked. Invalid codes are never present.
pub fn exists(asset: &LanguageAsset, dir: &Path) -> bool {
    is_valid_code(&asset.code) && asset_path(asset, dir).is_file()
}

/// Codes of every installed asset, sorted. A missing or unreadable directory
/// yields an empty set.
pub fn list_installed(dir: &Path) -> BTreeSet<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Tessdata directory not readable");
            return BTreeSet::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let code = name.strip_suffix(ASSET_SUFFIX)?;
            (!code.is_empty()).then(|| code.to_string())
        })
        .collect()
}

/// Remove an installed asset. Deleting an absent asset is an error, and so
/// is a code that would resolve outside `dir`.
pub fn delete(asset: &LanguageAsset, dir: &Path) -> Result<()> {
    if !is_valid_code(&asset.code) {
        return Err(TesskitError::Filesystem(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("'{}' is not a valid language code", asset.code),
        )));
    }

    let path = asset_path(asset, dir);
    std::fs::remove_file(&path)?;
    debug!(code = %asset.code, path = %path.display(), "Deleted language asset");
    Ok(())
}
