#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use log::LevelFilter;
use manga_async_runtime::{LookupController, LookupPipeline};
use manga_reader::constants::{CONFIG_FILE_NAME, LAST_PAGE_FILE_NAME, TITLE_PREFIX};
use manga_reader::{Keymap, LastPageStore, PageCatalog, ReaderOptions, app_data_dir};
use std::path::PathBuf;

mod app;
mod input;
mod logger;
mod pages;
mod textures;
mod views;

use app::{ReaderApp, Session};
use logger::AppLogger;
use pages::PageStore;

/// Log entries kept for the status strip
const MAX_LOG_ENTRIES: usize = 200;

#[derive(Parser, Debug)]
#[command(name = "ocr-manga", about = "OCR Manga Reader")]
struct Cli {
    /// A .cbz/.zip, .cbr/.rar, .tar file, or a directory containing your manga
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = AppLogger::new(MAX_LOG_ENTRIES, level);
    logger
        .clone()
        .init()
        .context("Failed to install logger")?;

    let source = manga_archive::open_source(&cli.path)
        .with_context(|| format!("Cannot open {}", cli.path.display()))?;
    let archive = std::fs::canonicalize(&cli.path).unwrap_or_else(|_| cli.path.clone());

    let config_dir = app_data_dir();
    let options = match &config_dir {
        Some(dir) => ReaderOptions::load_or_default(dir.join(CONFIG_FILE_NAME)),
        None => {
            log::warn!("No home directory, using default options");
            ReaderOptions::default()
        }
    };
    let (options, keymap) = match Keymap::from_options(&options) {
        Ok(keymap) => (options, keymap),
        Err(e) => {
            log::warn!("Ignoring configured key bindings: {}", e);
            let defaults = ReaderOptions::default();
            let keymap = Keymap::from_options(&defaults).context("Invalid default key bindings")?;
            (defaults, keymap)
        }
    };

    let pages = PageStore::new(source);
    let history_path = config_dir
        .map(|dir| dir.join(LAST_PAGE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LAST_PAGE_FILE_NAME));
    let history = LastPageStore::load(history_path);
    let start_index = history
        .get(&archive)
        .min(pages.page_count().saturating_sub(1));
    log::info!(
        "Opened {} ({} pages), resuming at page {}",
        archive.display(),
        pages.page_count(),
        start_index + 1
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start lookup runtime")?;
    let controller =
        LookupController::spawn(runtime.handle(), LookupPipeline::from_options(&options));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([options.width as f32, options.height as f32])
            .with_title(TITLE_PREFIX)
            .with_fullscreen(options.fullscreen),
        ..Default::default()
    };

    let session = Session {
        options,
        keymap,
        pages,
        history,
        archive,
        start_index,
        controller,
        logger,
    };

    eframe::run_native(
        "ocr-manga",
        native_options,
        Box::new(move |cc| Ok(Box::new(ReaderApp::new(cc, session)))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))?;

    // Lookups still running are abandoned with the runtime
    runtime.shutdown_background();
    Ok(())
}
