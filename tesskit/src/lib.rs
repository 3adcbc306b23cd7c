//! tesskit: Tesseract language data management.
//!
//! Resolves language codes against a built-in catalog, downloads
//! `<code>.traineddata` files with progress reporting and atomic publish,
//! lists and deletes installed languages, and (with the `engine` feature)
//! initializes Tesseract against the managed directory.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod manager;
pub mod progress;
pub mod refresh;
pub mod store;
pub mod transport;

pub use catalog::LanguageAsset;
pub use config::Config;
pub use error::{Result, TesskitError};
pub use manager::AssetManager;
