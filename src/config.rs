use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "yokaunit";

pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File the configuration was read from; None when running on defaults.
    pub config_path: Option<PathBuf>,
    /// Catalog file replacing the built-in catalog.
    pub catalog: Option<PathBuf>,
    pub limit: usize,
    pub log_level: String,
    pub output: OutputConfig,
    /// Dotted names of keys that were present but not understood.
    pub unknown_keys: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            catalog: None,
            limit: DEFAULT_LIMIT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            output: OutputConfig::default(),
            unknown_keys: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub json: bool,
    pub show_paths: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            show_paths: true,
        }
    }
}

// =============================================================================
// File format
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    catalog: Option<PathBuf>,
    limit: Option<usize>,
    log_level: Option<String>,
    output: OutputFile,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OutputFile {
    json: bool,
    show_paths: bool,
}

impl Default for OutputFile {
    fn default() -> Self {
        let defaults = OutputConfig::default();
        Self {
            json: defaults.json,
            show_paths: defaults.show_paths,
        }
    }
}

impl From<OutputFile> for OutputConfig {
    fn from(file: OutputFile) -> Self {
        Self {
            json: file.json,
            show_paths: file.show_paths,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

pub fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| anyhow!("unable to resolve base directories"))?;
    Ok(base.config_dir().join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

/// Load configuration.
///
/// An explicit path must exist. Without one the platform config file is
/// used when present, and defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("configuration file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = config_path()?;
            if !path.exists() {
                return Ok(Config::default());
            }
            path
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;

    parse(&raw, &path)
}

/// Parse configuration text read from `path`.
pub fn parse(raw: &str, path: &Path) -> Result<Config> {
    let value: toml::Value = toml::from_str(raw)
        .with_context(|| format!("failed to parse {} as TOML", path.display()))?;

    let unknown_keys = unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .with_context(|| format!("failed to deserialize config from {}", path.display()))?;

    let limit = cfg_file.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        bail!("`limit` must be at least 1 in {}", path.display());
    }

    let log_level = cfg_file
        .log_level
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_string();

    let catalog = cfg_file
        .catalog
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| expand_tilde(&p));

    Ok(Config {
        config_path: Some(path.to_path_buf()),
        catalog,
        limit,
        log_level,
        output: cfg_file.output.into(),
        unknown_keys,
    })
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

// =============================================================================
// Unknown keys
// =============================================================================

fn unknown_keys(value: &toml::Value) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };

    let known = HashSet::from(["catalog", "limit", "log_level", "output"]);
    let mut unknown: Vec<String> = table
        .keys()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect();

    if let Some(output) = table.get("output") {
        unknown.extend(unknown_in_section(output, "output", &["json", "show_paths"]));
    }

    unknown
}

fn unknown_in_section(value: &toml::Value, section: &str, known: &[&str]) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };
    table
        .keys()
        .filter(|key| !known.contains(&key.as_str()))
        .map(|key| format!("{}.{}", section, key))
        .collect()
}
