use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tesskit::catalog::{self, LanguageAsset};
use tesskit::config::Config;
use tesskit::engine::PageSegMode;
use tesskit::progress;
use tesskit::AssetManager;

#[derive(Parser)]
#[command(name = "tesskit")]
#[command(about = "Manage Tesseract language data files")]
struct Args {
    /// Tessdata directory (defaults to TESSDATA_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List known languages
    Catalog {
        /// Query the remote listing for current file sizes
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        json: bool,
    },
    /// List installed languages
    Installed {
        #[arg(long)]
        json: bool,
    },
    /// Download languages that are not installed yet
    Fetch {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Remove an installed language
    Delete { code: String },
    /// Recognize text in an image (requires the `engine` feature)
    Ocr {
        image: PathBuf,
        /// `+`-joined language codes (defaults to OCR_LANGUAGES)
        #[arg(long)]
        lang: Option<String>,
        /// Page segmentation mode 0-13 (defaults to OCR_PSM)
        #[arg(long)]
        psm: Option<PageSegMode>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tesskit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(dir) = args.dir {
        config.tessdata.dir = dir;
    }

    let manager = AssetManager::from_config(&config.tessdata)?;
    let dir = config.tessdata.dir.clone();

    match args.command {
        Command::Catalog { remote, json } => {
            let assets = if remote {
                manager.refresh_or_fallback().await
            } else {
                catalog::all_known_assets()
            };
            print_catalog(&assets, &manager.list_installed(&dir), json)?;
        }
        Command::Installed { json } => {
            let installed = manager.list_installed(&dir);
            if json {
                println!("{}", serde_json::to_string_pretty(&installed)?);
            } else {
                for code in &installed {
                    let name = catalog::display_name(code).unwrap_or(code.as_str());
                    println!("{code:<16} {name}");
                }
            }
        }
        Command::Fetch { codes } => fetch(&manager, &dir, &codes).await?,
        Command::Delete { code } => {
            if !catalog::is_valid_code(&code) {
                anyhow::bail!("'{code}' is not a valid language code");
            }
            let asset = catalog::lookup(&code)
                .unwrap_or_else(|| LanguageAsset::new(code.clone(), code.clone()));
            manager.delete(&asset, &dir)?;
            tracing::info!(code = %code, "Deleted");
        }
        Command::Ocr { image, lang, psm } => {
            if let Some(lang) = lang {
                config.engine.languages = lang;
            }
            if let Some(psm) = psm {
                config.engine.page_seg_mode = psm.as_u8();
            }
            ocr(&manager, &dir, &config, &image).await?;
        }
    }

    Ok(())
}

fn print_catalog(
    assets: &[LanguageAsset],
    installed: &std::collections::BTreeSet<String>,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(assets)?);
        return Ok(());
    }

    for asset in assets {
        let mark = if installed.contains(&asset.code) { "*" } else { " " };
        let size = asset
            .expected_size
            .map(|s| format!("{:.1} MB", s as f64 / 1_000_000.0))
            .unwrap_or_default();
        println!(
            "{mark} {:<16} {:<36} {size}",
            asset.code, asset.display_name
        );
    }
    Ok(())
}

async fn fetch(manager: &AssetManager, dir: &Path, codes: &[String]) -> anyhow::Result<()> {
    if let [code] = codes {
        let (on_progress, mut rx) = progress::channel();
        let label = code.clone();
        let printer = tokio::spawn(async move {
            let mut last = None;
            while let Some(fraction) = rx.recv().await {
                let percent = (fraction * 100.0).floor() as u32;
                if last != Some(percent) {
                    eprint!("\r{label}: {percent:>3}%");
                    last = Some(percent);
                }
            }
            if last.is_some() {
                eprintln!();
            }
        });

        let report: progress::ProgressFn = &on_progress;
        let result = manager.ensure_available(code, dir, Some(report)).await;
        drop(on_progress);
        let _ = printer.await;

        println!("{}", result?.display());
        return Ok(());
    }

    let mut failed = 0;
    for (code, result) in manager.ensure_many(codes, dir).await {
        match result {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                failed += 1;
                tracing::error!(code = %code, retryable = e.is_retryable(), "Fetch failed: {}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} languages could not be installed", codes.len());
    }
    Ok(())
}

#[cfg(feature = "engine")]
async fn ocr(manager: &AssetManager, dir: &Path, config: &Config, image: &Path) -> anyhow::Result<()> {
    use tesskit::engine::OcrEngine;

    let engine = OcrEngine::prepare(manager, dir, &config.engine, None).await?;
    let bytes = tokio::fs::read(image).await?;
    let text = engine.recognize(&bytes).await?;

    println!("{text}");
    tracing::info!(confidence = engine.confidence()?, languages = %engine.languages(), "Recognition complete");
    Ok(())
}

#[cfg(not(feature = "engine"))]
async fn ocr(_manager: &AssetManager, _dir: &Path, _config: &Config, _image: &Path) -> anyhow::Result<()> {
    anyhow::bail!("tesskit was built without the `engine` feature")
}
