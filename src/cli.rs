//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use photo_archiver_core::{DEFAULT_API_VERSION, DEFAULT_FOLDER, DEFAULT_MANIFEST_PATH, NamingKey};

use crate::app_config::DEFAULT_CONFIG_PATH;

/// Archive VK profile photos to Yandex Disk.
///
/// Lists a user's profile photos, writes a JSON manifest of their names and
/// sizes, and asks Yandex Disk to fetch each photo into a remote folder.
#[derive(Parser, Debug)]
#[command(name = "photo-archiver")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to the INI file holding the VK and Yandex credentials
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Number of profile photos to archive (1-1000)
    #[arg(short = 'n', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub count: u32,

    /// Where to write the photo manifest
    #[arg(short = 'm', long, default_value = DEFAULT_MANIFEST_PATH)]
    pub manifest: PathBuf,

    /// Write the manifest to a temporary file and rename it into place
    #[arg(long)]
    pub atomic_manifest: bool,

    /// Remote Yandex Disk folder
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: String,

    /// Photo field used as the file name: `likes` (collisions get a date suffix) or `id`
    #[arg(long, default_value_t = NamingKey::Likes)]
    pub name_key: NamingKey,

    /// Minimum delay between VK calls and between listed photos in milliseconds (0 to disable, max 60000)
    #[arg(long, default_value_t = 75, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub source_delay_ms: u64,

    /// Minimum delay between uploads in milliseconds (0 to disable, max 60000)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub upload_delay_ms: u64,

    /// VK API version
    #[arg(long, default_value = DEFAULT_API_VERSION)]
    pub api_version: String,
}
