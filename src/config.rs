use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Numeric font weight on the usual 100–900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);

    pub const fn is_bold(self) -> bool {
        self.0 >= Self::BOLD.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Typography used when styling a document. Read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub font_size: f32,
    /// Sizes for header levels 1 through 6.
    pub heading_font_sizes: [f32; 6],
    pub heading_font_weights: [FontWeight; 6],
    pub superscript_font_size: f32,
    pub subscript_font_size: f32,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            heading_font_sizes: [32.0, 25.0, 22.0, 18.0, 16.0, 16.0],
            heading_font_weights: [FontWeight::BOLD; 6],
            superscript_font_size: 8.0,
            subscript_font_size: 8.0,
        }
    }
}

impl MarkdownConfig {
    /// Font size for a header `level`; levels past 6 use the level-6 entry.
    pub fn heading_font_size(&self, level: usize) -> f32 {
        self.heading_font_sizes[heading_index(level)]
    }

    pub fn heading_font_weight(&self, level: usize) -> FontWeight {
        self.heading_font_weights[heading_index(level)]
    }
}

fn heading_index(level: usize) -> usize {
    level.clamp(1, 6) - 1
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mdsync").join("config.json");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mdsync")
                .join("config.json");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mdsync").join("config.json");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("mdsync")
                .join("config.json");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdsync.json")
}

/// Load a config file. A missing file yields the defaults; fields absent
/// from the file keep their default values.
pub fn load_config(path: &Path) -> Result<MarkdownConfig> {
    if !path.exists() {
        return Ok(MarkdownConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

pub fn save_config(path: &Path, config: &MarkdownConfig) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Pick the effective config: an explicit path must exist; otherwise the
/// local override wins over the global file.
pub fn resolve_config(explicit: Option<&Path>) -> Result<MarkdownConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file {} does not exist", path.display());
        }
        return load_config(path);
    }
    let local = local_override_path();
    if local.exists() {
        return load_config(&local);
    }
    load_config(&global_config_path())
}
