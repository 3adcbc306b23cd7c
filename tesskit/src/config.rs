use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://github.com/tesseract-ocr/tessdata_best/raw/main/";
pub const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/tesseract-ocr/tessdata_best/contents";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// `$XDG_DATA_HOME/tesskit/tessdata` (or the platform equivalent), falling
/// back to `./tessdata` when no data directory is known.
fn default_tessdata_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tesskit").join("tessdata"))
        .unwrap_or_else(|| PathBuf::from("tessdata"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tessdata: TessdataConfig,
    pub engine: EngineConfig,
}

/// Where language assets live and where they are fetched from.
#[derive(Debug, Clone)]
pub struct TessdataConfig {
    pub dir: PathBuf,
    pub base_url: String,
    pub listing_url: String,
    /// Temporary download location; the system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
    /// Whole-request timeout; transport default when unset.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// `+`-joined language codes, e.g. `eng+fra`.
    pub languages: String,
    pub page_seg_mode: u8,
}

impl Default for TessdataConfig {
    fn default() -> Self {
        Self {
            dir: default_tessdata_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            staging_dir: None,
            timeout_secs: None,
            user_agent: format!("tesskit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            languages: "eng".to_string(),
            page_seg_mode: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let tessdata = TessdataConfig::default();
        let engine = EngineConfig::default();

        Self {
            tessdata: TessdataConfig {
                dir: env::var("TESSDATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(tessdata.dir),
                base_url: env::var("TESSDATA_BASE_URL").unwrap_or(tessdata.base_url),
                listing_url: env::var("TESSDATA_LISTING_URL").unwrap_or(tessdata.listing_url),
                staging_dir: env::var("TESSDATA_STAGING_DIR").ok().map(PathBuf::from),
                timeout_secs: parse_env_opt("TESSDATA_TIMEOUT"),
                user_agent: env::var("TESSDATA_USER_AGENT").unwrap_or(tessdata.user_agent),
            },
            engine: EngineConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or(engine.languages),
                page_seg_mode: parse_env_or("OCR_PSM", engine.page_seg_mode),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "TESSDATA_DIR",
        "TESSDATA_BASE_URL",
        "TESSDATA_LISTING_URL",
        "TESSDATA_STAGING_DIR",
        "TESSDATA_TIMEOUT",
        "TESSDATA_USER_AGENT",
        "OCR_LANGUAGES",
        "OCR_PSM",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_tessdata_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert_eq!(config.tessdata.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.tessdata.listing_url, DEFAULT_LISTING_URL);
        assert!(config.tessdata.staging_dir.is_none());
        assert!(config.tessdata.timeout_secs.is_none());
        assert!(config.tessdata.user_agent.starts_with("tesskit/"));
        assert!(config.tessdata.dir.ends_with("tessdata"));
    }

    #[test]
    fn test_engine_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert_eq!(config.engine.languages, "eng");
        assert_eq!(config.engine.page_seg_mode, 3);
    }

    #[test]
    fn test_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("TESSDATA_DIR", "/srv/tessdata");
        std::env::set_var("TESSDATA_BASE_URL", "http://mirror.local/models/");
        std::env::set_var("TESSDATA_TIMEOUT", "45");
        std::env::set_var("OCR_LANGUAGES", "eng+fra");
        std::env::set_var("OCR_PSM", "6");

        let config = Config::from_env();
        assert_eq!(config.tessdata.dir, PathBuf::from("/srv/tessdata"));
        assert_eq!(config.tessdata.base_url, "http://mirror.local/models/");
        assert_eq!(config.tessdata.timeout_secs, Some(45));
        assert_eq!(config.engine.languages, "eng+fra");
        assert_eq!(config.engine.page_seg_mode, 6);

        clear_env();
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("TESSDATA_TIMEOUT", "soon");
        std::env::set_var("OCR_PSM", "-1");

        let config = Config::from_env();
        assert!(config.tessdata.timeout_secs.is_none());
        assert_eq!(config.engine.page_seg_mode, 3);

        clear_env();
    }
}
