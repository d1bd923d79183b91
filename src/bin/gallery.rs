use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portfolio_gallery_wasm::content::validate_collection;
use portfolio_gallery_wasm::gallery::{CategoryFilter, Gallery, QueryState, SortOrder};
use portfolio_gallery_wasm::manifest::{load_manifest_file, resolve_with_fallback};
use portfolio_gallery_wasm::settings::{SettingsStore, Theme};
use portfolio_gallery_wasm::extractor::{read_image, try_extract_palette};
use portfolio_gallery_wasm::seed;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Inspect portfolio content natively: palettes, manifests and gallery queries.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Settings file (theme, manifest path, palette size)
    #[arg(long, default_value = "gallery.json", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dominant colours of one or more images
    Palette {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Number of colours per image (defaults to the configured palette size)
        #[arg(short = 'k', long)]
        count: Option<usize>,
    },
    /// Normalize a paintings manifest and print the resulting items as JSON
    Manifest {
        /// Manifest path (defaults to the configured one)
        path: Option<PathBuf>,
    },
    /// Filter and sort the gallery the way the site does
    Query {
        /// Use paintings from a manifest instead of the built-in projects
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        #[arg(short, long, default_value = "")]
        search: String,

        /// all, painting, 3d or game
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// new or old
        #[arg(long, default_value = "new")]
        sort: SortOrder,
    },
    /// Show or change the site theme
    Theme { theme: Option<Theme> },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut store = SettingsStore::open(&args.config).context("loading settings failed")?;

    match args.command {
        Command::Palette { inputs, count } => {
            let count = count.unwrap_or(store.settings().palette_count);
            for input in &inputs {
                let colors: Vec<String> = match read_image(input).and_then(|bytes| try_extract_palette(&bytes, count)) {
                    Ok(swatches) => swatches.iter().map(|s| s.css()).collect(),
                    Err(e) => {
                        tracing::warn!(input = %input.display(), error = %e, "no palette");
                        Vec::new()
                    }
                };
                println!("{}", json!({ "image": input.display().to_string(), "palette": colors }));
            }
        }
        Command::Manifest { path } => {
            let path = path.unwrap_or_else(|| store.settings().manifest_path.clone());
            let loaded = resolve_with_fallback(load_manifest_file(&path), seed::paintings_fallback());
            if let Some(error) = &loaded.error {
                eprintln!("{error}; using built-in paintings");
            }
            println!("{}", serde_json::to_string_pretty(&loaded.items)?);
        }
        Command::Query {
            manifest,
            search,
            category,
            sort,
        } => {
            let items = match manifest {
                Some(path) => {
                    let loaded = resolve_with_fallback(load_manifest_file(&path), seed::paintings_fallback());
                    if let Some(error) = &loaded.error {
                        eprintln!("{error}; using built-in paintings");
                    }
                    loaded.items
                }
                None => seed::projects(),
            };
            validate_collection(&items).context("content collection is inconsistent")?;

            let gallery = Gallery::with_query(items, QueryState::new(search, category, sort));
            for (key, count) in gallery.counts().entries() {
                eprint!("{key}: {count}  ");
            }
            eprintln!();
            for item in gallery.visible() {
                let year = item.year.map(|y| y.to_string()).unwrap_or_else(|| "----".to_string());
                println!("{year}  {:<10}  {}", item.id, item.title);
            }
        }
        Command::Theme { theme } => {
            if let Some(theme) = theme {
                store.set_theme(theme).context("saving theme failed")?;
            }
            println!("{}", store.settings().theme);
        }
    }

    Ok(())
}
