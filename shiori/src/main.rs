use std::{
    sync::{Arc, RwLock, mpsc},
    time::Duration,
};

use anyhow::Context as _;

mod config;
mod thumbnail_cache;
mod ui;

use shiori_client_shared as scs;
use shiori_core as sc;

use crate::{config::Config, thumbnail_cache::ThumbnailCache};

const THUMBNAIL_CACHE_SIZE: usize = 200;
const THUMBNAIL_CACHE_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "shiori=info,shiori_core=info,shiori_client_shared=info",
                )
            }),
        )
        .init();

    // Load and save config at startup so new fields are written out
    let config = Config::load().with_context(|| format!("failed to load {}", Config::FILENAME))?;
    config
        .save()
        .with_context(|| format!("failed to save {}", Config::FILENAME))?;

    let thumbnails_dir =
        scs::thumbnails::PlatformThumbnailsDir::resolve(config.general.thumbnails_dir.as_deref());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("shiori")
            .with_inner_size([
                config.general.window_width as f32,
                config.general.window_height as f32,
            ]),
        ..eframe::NativeOptions::default()
    };

    let config = Arc::new(RwLock::new(config));

    eframe::run_native(
        "shiori",
        native_options,
        Box::new(move |cc| {
            let (thumbnail_loaded_tx, thumbnail_loaded_rx) = mpsc::channel();
            let logic = {
                let config = config.read().unwrap();
                let ctx = cc.egui_ctx.clone();
                let filesystem_source = sc::sf::FilesystemSource::new(
                    config.search.filesystem_root.clone(),
                    config.search.page_size,
                );
                tracing::info!(
                    "reading the filesystem library from {}",
                    filesystem_source.root().display()
                );
                sc::Logic::new(sc::LogicArgs {
                    search_extension: config.search.extension.clone(),
                    settings: sc::Settings {
                        library_columns: config.general.library_columns,
                    },
                    sources: vec![Arc::new(filesystem_source)],
                    thumbnail_loaded_tx,
                    request_repaint: Arc::new(move || ctx.request_repaint()),
                })?
            };

            Ok(Box::new(App::new(
                cc,
                config.clone(),
                logic,
                thumbnail_loaded_rx,
                thumbnails_dir.clone(),
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run shiori: {e}"))
}

pub struct App {
    config: Arc<RwLock<Config>>,
    logic: sc::Logic,
    thumbnail_cache: ThumbnailCache,
    thumbnails_dir: scs::thumbnails::PlatformThumbnailsDir,
    ui_state: ui::UiState,
}
impl App {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: Arc<RwLock<Config>>,
        logic: sc::Logic,
        thumbnail_loaded_rx: mpsc::Receiver<sc::Thumbnail>,
        thumbnails_dir: scs::thumbnails::PlatformThumbnailsDir,
    ) -> Self {
        let ui_state = ui::initialize(cc, &config.read().unwrap());

        // Start out browsing everything the source has
        logic.handle_search(true);

        Self {
            config,
            logic,
            thumbnail_cache: ThumbnailCache::new(
                thumbnail_loaded_rx,
                THUMBNAIL_CACHE_SIZE,
                THUMBNAIL_CACHE_TIMEOUT,
            ),
            thumbnails_dir,
            ui_state,
        }
    }
}
impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for key in self.thumbnail_cache.update() {
            ctx.forget_image(&thumbnail_cache::thumbnail_uri(&key));
        }

        self.render(ctx);

        let repaint_secs = self.config.read().unwrap().general.repaint_secs;
        ctx.request_repaint_after(Duration::from_secs_f32(repaint_secs.max(0.0)));
    }
}
