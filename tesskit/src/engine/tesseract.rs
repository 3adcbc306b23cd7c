use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use leptess::{LepTess, Variable};
use tracing::{debug, info};

use super::PageSegMode;
use crate::config::EngineConfig;
use crate::error::{Result, TesskitError};
use crate::manager::AssetManager;
use crate::progress::ProgressFn;

/// Split `eng+fra` into its component codes.
pub fn split_languages(languages: &str) -> Vec<&str> {
    languages
        .split('+')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Tesseract instance bound to one tessdata directory and language set.
///
/// Recognition runs on the blocking pool; concurrent calls on one engine
/// are serialized by the inner lock.
#[derive(Clone)]
pub struct OcrEngine {
    tesseract: Arc<Mutex<LepTess>>,
    page_seg_mode: Arc<AtomicU8>,
    data_path: PathBuf,
    languages: String,
}

fn create_tesseract(data_path: &Path, languages: &str) -> Result<LepTess> {
    let path = data_path.to_string_lossy();
    LepTess::new(Some(path.as_ref()), languages)
        .map_err(|e| TesskitError::EngineInit(e.to_string()))
}

fn apply_page_seg_mode(lt: &mut LepTess, mode: PageSegMode) -> Result<()> {
    lt.set_variable(Variable::TesseditPagesegMode, &mode.to_string())
        .map_err(|e| TesskitError::EngineInit(format!("Failed to set page segmentation mode: {e}")))
}

impl OcrEngine {
    /// Initialize against language files already present in `data_path`.
    pub fn initialize(data_path: &Path, languages: &str) -> Result<Self> {
        if !data_path.is_dir() {
            return Err(TesskitError::DataPathNotFound(data_path.to_path_buf()));
        }

        let lt = create_tesseract(data_path, languages)?;

        info!(languages = %languages, data_path = %data_path.display(), "Tesseract initialized");

        Ok(Self {
            tesseract: Arc::new(Mutex::new(lt)),
            page_seg_mode: Arc::new(AtomicU8::new(PageSegMode::default().as_u8())),
            data_path: data_path.to_path_buf(),
            languages: languages.to_string(),
        })
    }

    /// Download whatever the configured languages need, then initialize.
    pub async fn prepare(
        manager: &AssetManager,
        data_path: &Path,
        config: &EngineConfig,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<Self> {
        let mode = PageSegMode::from_u8_or_default(config.page_seg_mode);

        let codes = split_languages(&config.languages);
        if codes.is_empty() {
            return Err(TesskitError::UnknownLanguage(config.languages.clone()));
        }
        let languages = codes.join("+");

        let osd = mode.needs_osd().then_some(crate::catalog::SENTINEL_CODE);
        for code in codes.iter().copied().chain(osd) {
            manager.ensure_available(code, data_path, on_progress).await?;
        }

        let engine = Self::initialize(data_path, &languages)?;
        engine.set_page_seg_mode(mode)?;
        Ok(engine)
    }

    pub fn set_page_seg_mode(&self, mode: PageSegMode) -> Result<()> {
        let mut lt = self.lock()?;
        apply_page_seg_mode(&mut lt, mode)?;
        self.page_seg_mode.store(mode.as_u8(), Ordering::SeqCst);
        debug!(mode = %mode, "Page segmentation mode set");
        Ok(())
    }

    /// Recognize text in an encoded image (PNG, JPEG, TIFF, ...).
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        let bytes = image_bytes.to_vec();
        let tesseract = Arc::clone(&self.tesseract);

        let text = tokio::task::spawn_blocking(move || {
            let mut lt = tesseract
                .lock()
                .map_err(|_| TesskitError::EngineUnavailable("engine lock poisoned".to_string()))?;
            lt.set_image_from_mem(&bytes)
                .map_err(|e| TesskitError::ImageProcessing(format!("Failed to set image: {e}")))?;
            lt.get_utf8_text()
                .map_err(|e| TesskitError::Recognition(format!("Failed to extract text: {e}")))
        })
        .await
        .map_err(|e| TesskitError::Recognition(format!("OCR task panicked: {e}")))??;

        Ok(text.trim().to_string())
    }

    pub fn page_seg_mode(&self) -> PageSegMode {
        PageSegMode::from_u8_or_default(self.page_seg_mode.load(Ordering::SeqCst))
    }

    /// Drop the current image and recognition results by swapping in a
    /// fresh instance with the same languages and page segmentation mode.
    pub fn clear(&self) -> Result<()> {
        let mut fresh = create_tesseract(&self.data_path, &self.languages)?;
        apply_page_seg_mode(&mut fresh, self.page_seg_mode())?;
        *self.lock()? = fresh;
        debug!(languages = %self.languages, "Tesseract state cleared");
        Ok(())
    }

    /// Mean word confidence (0-100) of the last recognition.
    pub fn confidence(&self) -> Result<i32> {
        Ok(self.lock()?.mean_text_conf())
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LepTess>> {
        self.tesseract
            .lock()
            .map_err(|_| TesskitError::EngineUnavailable("engine lock poisoned".to_string()))
    }
}
