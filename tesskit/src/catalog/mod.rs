//! Language Catalog
//!
//! Resolves Tesseract language codes (`eng`, `chi_sim`, ...) to descriptive
//! metadata. Two read-only tables back it:
//! - a curated list of common languages with script and approximate size
//! - the full code-to-name map for everything published upstream
//!
//! The `osd` code names orientation/script detection data rather than a
//! language, so it is addressable through [`lookup`] but excluded from
//! [`all_known_assets`].

mod tables;

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use tables::{CURATED, NAMES};

/// File suffix shared by every language model.
pub const ASSET_SUFFIX: &str = ".traineddata";

/// Reserved code for orientation and script detection data.
pub const SENTINEL_CODE: &str = "osd";

/// One language's trained-model file.
///
/// Equality and hashing only consider `code`.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageAsset {
    pub code: String,
    pub display_name: String,
    pub script: Option<String>,
    /// Advisory only, never used to verify downloads.
    pub expected_size: Option<u64>,
}

impl LanguageAsset {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            script: None,
            expected_size: None,
        }
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_expected_size(mut self, size: u64) -> Self {
        self.expected_size = Some(size);
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.code, ASSET_SUFFIX)
    }
}

impl PartialEq for LanguageAsset {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for LanguageAsset {}

impl Hash for LanguageAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// Ordering used for every listing: display name, then code.
pub fn by_display_name(a: &LanguageAsset, b: &LanguageAsset) -> Ordering {
    a.display_name
        .cmp(&b.display_name)
        .then_with(|| a.code.cmp(&b.code))
}

/// Codes must be usable both as a URL path segment and as a file stem.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Display name from the full map, if the code is known.
pub fn display_name(code: &str) -> Option<&'static str> {
    NAMES
        .binary_search_by(|(c, _)| (*c).cmp(code))
        .ok()
        .map(|idx| NAMES[idx].1)
}

/// The curated languages, in priority order.
pub fn curated() -> Vec<LanguageAsset> {
    CURATED
        .iter()
        .map(|(code, name, script, size)| {
            LanguageAsset::new(*code, *name)
                .with_script(*script)
                .with_expected_size(*size)
        })
        .collect()
}

/// Resolve a code: curated entries first, then the full name map.
pub fn lookup(code: &str) -> Option<LanguageAsset> {
    if let Some((code, name, script, size)) = CURATED.iter().find(|(c, ..)| *c == code) {
        return Some(
            LanguageAsset::new(*code, *name)
                .with_script(*script)
                .with_expected_size(*size),
        );
    }

    display_name(code).map(|name| LanguageAsset::new(code, name))
}

/// Every known OCR language (sentinel excluded), sorted by display name.
pub fn all_known_assets() -> Vec<LanguageAsset> {
    let mut assets: Vec<LanguageAsset> = NAMES
        .iter()
        .filter(|(code, _)| *code != SENTINEL_CODE)
        .map(|(code, name)| LanguageAsset::new(*code, *name))
        .collect();

    assets.sort_by(by_display_name);
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_table_sorted_by_code() {
        assert!(NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_curated_entries_present_in_full_map() {
        for (code, name, _, _) in CURATED {
            assert_eq!(display_name(code), Some(*name), "mismatch for {code}");
        }
    }

    #[test]
    fn test_lookup_returns_curated_fields() {
        for asset in curated() {
            let found = lookup(&asset.code).unwrap();
            assert_eq!(found, asset);
            assert_eq!(found.display_name, asset.display_name);
            assert_eq!(found.script, asset.script);
            assert_eq!(found.expected_size, asset.expected_size);
        }
    }

    #[test]
    fn test_lookup_falls_back_to_full_map() {
        let asset = lookup("afr").unwrap();
        assert_eq!(asset.display_name, "Afrikaans");
        assert!(asset.script.is_none());
        assert!(asset.expected_size.is_none());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("zzz_not_real").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_lookup_sentinel_still_resolves() {
        let osd = lookup(SENTINEL_CODE).unwrap();
        assert_eq!(osd.display_name, "Orientation Script Detection");
    }

    #[test]
    fn test_all_known_assets_excludes_sentinel() {
        let assets = all_known_assets();
        assert_eq!(assets.len(), NAMES.len() - 1);
        assert!(assets.iter().all(|a| a.code != SENTINEL_CODE));
        assert!(assets.iter().all(|a| a.script.is_none() && a.expected_size.is_none()));
    }

    #[test]
    fn test_all_known_assets_sorted_by_name() {
        let assets = all_known_assets();
        assert!(assets
            .windows(2)
            .all(|w| by_display_name(&w[0], &w[1]) != Ordering::Greater));
        assert_eq!(assets[0].display_name, "Afrikaans");
    }

    #[test]
    fn test_equality_by_code_only() {
        let a = LanguageAsset::new("eng", "English");
        let b = LanguageAsset::new("eng", "Anglais").with_expected_size(1);
        assert_eq!(a, b);

        let set: HashSet<LanguageAsset> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            LanguageAsset::new("chi_sim", "Chinese (Simplified)").file_name(),
            "chi_sim.traineddata"
        );
    }

    #[test]
    fn test_code_validation() {
        assert!(is_valid_code("eng"));
        assert!(is_valid_code("chi_sim_vert"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("../eng"));
        assert!(!is_valid_code("eng/fra"));
        assert!(!is_valid_code("eng fra"));
        assert!(!is_valid_code("eng?x=1"));
        assert!(!is_valid_code("eng.old"));
    }
}
