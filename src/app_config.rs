//! Credentials file loading.
//!
//! The archiver reads an INI file with two sections:
//!
//! ```ini
//! [vk]
//! token = "vk1.a.xxxx"
//! user_id = 1
//!
//! [yandex]
//! token = "y0_xxxx"
//! ```
//!
//! Values may be bare or double-quoted. `#` and `;` start comments outside
//! quotes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.ini";

/// Credentials needed for one archive run.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiverConfig {
    /// VK API access token.
    pub vk_token: String,
    /// VK user whose profile photos are archived.
    pub vk_user_id: i64,
    /// Yandex Disk OAuth token.
    pub yandex_token: String,
}

impl std::fmt::Debug for ArchiverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiverConfig")
            .field("vk_token", &"<redacted>")
            .field("vk_user_id", &self.vk_user_id)
            .field("yandex_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Vk,
    Yandex,
}

/// Loads and validates the config file at `path`.
pub fn load_config(path: &Path) -> Result<ArchiverConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<ArchiverConfig> {
    let mut section: Option<Section> = None;
    let mut vk_token: Option<String> = None;
    let mut vk_user_id: Option<i64> = None;
    let mut yandex_token: Option<String> = None;

    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                bail!("Invalid section header on line {line_no}: missing closing ']'");
            };
            section = Some(match name.trim().to_ascii_lowercase().as_str() {
                "vk" => Section::Vk,
                "yandex" => Section::Yandex,
                unknown => bail!("Unknown config section: '[{unknown}]' on line {line_no}"),
            });
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = parse_value(raw_value.trim())
            .with_context(|| format!("Invalid `{key}` value on line {line_no}"))?;

        match (section, key) {
            (None, _) => bail!("Key '{key}' on line {line_no} is outside any section"),
            (Some(Section::Vk), "token") => vk_token = Some(value),
            (Some(Section::Vk), "user_id") => {
                let id = value.parse::<i64>().with_context(|| {
                    format!("Invalid `user_id` value '{value}' on line {line_no}: expected an integer")
                })?;
                vk_user_id = Some(id);
            }
            (Some(Section::Yandex), "token") => yandex_token = Some(value),
            (Some(_), unknown) => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }

    let Some(vk_token) = vk_token else {
        bail!("Missing required key `token` in section [vk]");
    };
    let Some(vk_user_id) = vk_user_id else {
        bail!("Missing required key `user_id` in section [vk]");
    };
    let Some(yandex_token) = yandex_token else {
        bail!("Missing required key `token` in section [yandex]");
    };

    Ok(ArchiverConfig {
        vk_token,
        vk_user_id,
        yandex_token,
    })
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' | ';' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_value(raw_value: &str) -> Result<String> {
    let value = if raw_value.starts_with('"') {
        parse_string_literal(raw_value)?
    } else {
        raw_value.to_string()
    };
    if value.is_empty() {
        bail!("Expected a non-empty value");
    }
    Ok(value)
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}
