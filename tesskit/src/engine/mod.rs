//! OCR engine integration.
//!
//! `PageSegMode` is always available. The Tesseract-backed `OcrEngine`
//! links against the native tesseract/leptonica libraries through `leptess`
//! and is only compiled with the `engine` feature:
//!
//! ```toml
//! tesskit = { path = "tesskit", features = ["engine"] }
//! ```
//!
//! The engine never downloads on its own; `OcrEngine::prepare` runs the
//! asset manager first and then points Tesseract at the same directory.

mod mode;
#[cfg(feature = "engine")]
mod tesseract;

pub use mode::PageSegMode;
#[cfg(feature = "engine")]
pub use tesseract::{split_languages, OcrEngine};
