//! CLI entry point for the photo archiver.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use photo_archiver_core::{
    ArchiveOptions, ManifestWriter, NoProgress, Progress, Throttle, VkClient, YandexDisk,
    archive_profile_photos,
};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod progress_ui;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = app_config::load_config(&args.config)?;
    info!(user_id = config.vk_user_id, config = %args.config.display(), "Photo archiver starting");

    let source = VkClient::new(config.vk_token, config.vk_user_id)?
        .with_api_version(args.api_version.clone())
        .with_throttle(Throttle::from_millis(args.source_delay_ms));
    let storage = YandexDisk::new(config.yandex_token)?
        .with_folder(args.folder.clone())
        .with_throttle(Throttle::from_millis(args.upload_delay_ms));
    let manifest = ManifestWriter::new(&args.manifest).atomic(args.atomic_manifest);

    match source.user_info().await {
        Ok(user) => info!(
            id = user.id,
            first_name = %user.first_name,
            last_name = %user.last_name,
            "Archiving profile photos"
        ),
        Err(e) => warn!(error = %e, "Could not fetch VK profile; continuing"),
    }

    let options = ArchiveOptions {
        count: args.count,
        naming_key: args.name_key,
        item_delay: Duration::from_millis(args.source_delay_ms),
    };

    let bars;
    let progress: &dyn Progress =
        if progress_ui::should_show_progress(io::stderr().is_terminal(), args.quiet) {
            bars = progress_ui::BarProgress::new();
            &bars
        } else {
            &NoProgress
        };

    let summary = archive_profile_photos(
        &source,
        &storage,
        &manifest,
        &options,
        Local::now().date_naive(),
        progress,
    )
    .await?;

    info!(
        photos = summary.records.len(),
        uploaded = summary.uploaded,
        already_present = summary.already_present,
        manifest = %manifest.path().display(),
        "Archive complete"
    );

    let rendered =
        serde_json::to_string_pretty(&summary.manifest).context("Failed to render manifest")?;
    println!("{rendered}");

    Ok(())
}
