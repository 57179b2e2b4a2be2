//! Transit map gallery command line.
//!
//! - `optimize`: build thumbnails and WebP copies of the route maps
//! - `render`: export the viewer page as static HTML
//! - `verify`: check every catalog path against the built site

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_map_gallery::catalog::{verify_catalog, Catalog, Filter, SiteRoots};
use transit_map_gallery::config::{OptimizerConfig, ViewerConfig};
use transit_map_gallery::export::export_site;
use transit_map_gallery::optimizer::Optimizer;
use transit_map_gallery::viewer::{JsonFileStore, Startup};

#[derive(Parser, Debug)]
#[command(name = "transit-map-gallery")]
#[command(about = "Optimize transit route maps and render the gallery page")]
struct Args {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate PNG/WebP thumbnails and full-size WebP copies
    Optimize {
        /// JSON file with optimizer settings
        #[arg(long, env = "GALLERY_OPTIMIZER_CONFIG")]
        config: Option<PathBuf>,

        /// Folder with the source PNGs
        #[arg(long)]
        input: Option<PathBuf>,

        /// Root of the derivative tree
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum thumbnail width in pixels
        #[arg(long)]
        thumb_width: Option<u32>,

        /// WebP quality (0-100)
        #[arg(long)]
        webp_quality: Option<f32>,
    },

    /// Write index.html and lightbox.json for the gallery
    Render {
        /// Output directory
        #[arg(long, default_value = "dist")]
        out: PathBuf,

        /// JSON file with viewer settings
        #[arg(long, env = "GALLERY_VIEWER_CONFIG")]
        config: Option<PathBuf>,

        /// JSON catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Initial filter: all, national, city or details
        #[arg(long, default_value = "all")]
        filter: String,

        /// Assume the system prefers a dark color scheme
        #[arg(long)]
        prefers_dark: bool,

        /// Preference file holding the stored theme
        #[arg(long, env = "GALLERY_PREFS")]
        prefs: Option<PathBuf>,
    },

    /// Check that every catalog path exists on disk
    Verify {
        /// Project root (`public/` is looked up inside it)
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// JSON file with viewer settings
        #[arg(long, env = "GALLERY_VIEWER_CONFIG")]
        config: Option<PathBuf>,

        /// JSON catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_viewer_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading viewer config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

fn load_catalog(path: Option<&PathBuf>, config: &ViewerConfig) -> Result<Catalog> {
    match path {
        Some(path) => {
            Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))
        }
        None => Ok(Catalog::builtin(&config.assets)),
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match args.command {
        Command::Optimize {
            config,
            input,
            output,
            thumb_width,
            webp_quality,
        } => {
            let mut settings = match &config {
                Some(path) => OptimizerConfig::load(path)
                    .with_context(|| format!("loading optimizer config {}", path.display()))?,
                None => OptimizerConfig::default(),
            };
            if let Some(input) = input {
                settings.input_dir = input;
            }
            if let Some(output) = output {
                settings.output_dir = output;
            }
            if let Some(width) = thumb_width {
                settings.thumb_width = width;
            }
            if let Some(quality) = webp_quality {
                settings.webp_quality = quality.clamp(0.0, 100.0);
            }

            let report = Optimizer::new(settings)
                .run()
                .context("image optimization failed")?;
            if !report.failures.is_empty() {
                error!(failed = report.failures.len(), "Some files could not be optimized");
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Render {
            out,
            config,
            catalog,
            filter,
            prefers_dark,
            prefs,
        } => {
            let viewer_config = load_viewer_config(config.as_ref())?;
            let catalog = load_catalog(catalog.as_ref(), &viewer_config)?;
            let filter: Filter = filter.parse().context("invalid --filter")?;

            let prefs_path = match prefs {
                Some(path) => path,
                None => JsonFileStore::default_path()?,
            };
            let store = JsonFileStore::open(&prefs_path)?;

            let startup = Startup {
                prefers_dark,
                filter,
                ..Startup::default()
            };
            let report = export_site(&out, viewer_config, catalog, store, startup)
                .with_context(|| format!("exporting to {}", out.display()))?;
            info!(cards = report.cards, "✅ Render complete");
            Ok(ExitCode::SUCCESS)
        }

        Command::Verify {
            root,
            config,
            catalog,
        } => {
            let viewer_config = load_viewer_config(config.as_ref())?;
            let catalog = load_catalog(catalog.as_ref(), &viewer_config)?;
            let report = verify_catalog(&catalog, &SiteRoots::from_project_root(root));

            if report.is_complete() {
                info!(checked = report.checked, "✅ All catalog assets present");
                Ok(ExitCode::SUCCESS)
            } else {
                for missing in &report.missing {
                    error!(entry = %missing.entry_id, path = %missing.resolved.display(), "Missing");
                }
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
