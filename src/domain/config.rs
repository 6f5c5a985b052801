//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix service, access control, session expiry,
//! canvas settings and the font/color catalogs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::catalog::{ColorCatalog, FontCatalog};
use crate::domain::types::{MediaSource, Rgb};

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sticker: StickerConfig,
    #[serde(default)]
    pub fonts: FontsConfig,
    /// Overrides the built-in color names when non-empty.
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML")
    }

    pub fn font_catalog(&self) -> Result<FontCatalog> {
        FontCatalog::new(self.fonts.catalog.clone(), self.fonts.default.clone())
            .map_err(|e| anyhow::anyhow!(e))
    }

    pub fn color_catalog(&self) -> ColorCatalog {
        if self.colors.is_empty() {
            return ColorCatalog::default();
        }
        ColorCatalog::new(
            self.colors
                .iter()
                .map(|c| (c.name.clone(), Rgb::from(c.rgb)))
                .collect(),
        )
    }

    /// Whether `sender` may talk to the bot. An empty list admits everyone.
    pub fn is_allowed(&self, sender: &str) -> bool {
        self.access.allowed_users.is_empty()
            || self
                .access
                .allowed_users
                .iter()
                .any(|a| a.to_lowercase() == sender.to_lowercase())
    }
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AccessConfig {
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    600
}

/// Canvas and storage settings for rendered stickers.
#[derive(Debug, Deserialize, Clone)]
pub struct StickerConfig {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
    #[serde(default = "default_canvas_side")]
    pub width: u32,
    #[serde(default = "default_canvas_side")]
    pub height: u32,
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default = "default_overshoot")]
    pub overshoot_factor: f32,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            fonts_dir: default_fonts_dir(),
            width: default_canvas_side(),
            height: default_canvas_side(),
            margin: default_margin(),
            overshoot_factor: default_overshoot(),
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("data/content")
}
fn default_fonts_dir() -> PathBuf {
    PathBuf::from("data/fonts")
}
fn default_canvas_side() -> u32 {
    512
}
fn default_margin() -> u32 {
    10
}
fn default_overshoot() -> f32 {
    1.5
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct FontsConfig {
    #[serde(default)]
    pub default: String,
    /// Image showing every font with its number; `mxc://` handle or a local path.
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub catalog: Vec<String>,
}

impl FontsConfig {
    pub fn example_source(&self) -> Option<MediaSource> {
        self.example.as_ref().map(|e| {
            if e.starts_with("mxc://") {
                MediaSource::Remote(e.clone())
            } else {
                MediaSource::Local(PathBuf::from(e))
            }
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ColorEntry {
    pub name: String,
    pub rgb: [u8; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
services:
  matrix:
    username: bot
    password: pw
    homeserver: https://matrix.example.org
fonts:
  default: a.ttf
  catalog: [a.ttf, b.ttf]
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.session.ttl(), Duration::from_secs(600));
        assert_eq!(config.sticker.width, 512);
        assert_eq!(config.sticker.margin, 10);
        assert!(config.is_allowed("@anyone:example.org"));
        assert_eq!(config.color_catalog().names().len(), 9);
        assert_eq!(config.font_catalog().unwrap().max_index(), 2);
        assert_eq!(config.fonts.example_source(), None);
    }

    #[test]
    fn test_access_and_overrides() {
        let yaml = format!(
            "{MINIMAL}access:\n  allowed_users: [\"@Alice:example.org\"]\ncolors:\n  - {{ name: Teal, rgb: [0, 128, 128] }}\n"
        );
        let config = AppConfig::parse(&yaml).unwrap();
        assert!(config.is_allowed("@alice:example.org"));
        assert!(!config.is_allowed("@bob:example.org"));
        assert_eq!(config.color_catalog().lookup("teal"), Some(Rgb(0, 128, 128)));
    }

    #[test]
    fn test_example_source_kind() {
        let mut fonts = FontsConfig::default();
        fonts.example = Some("mxc://example.org/abc".into());
        assert_eq!(
            fonts.example_source(),
            Some(MediaSource::Remote("mxc://example.org/abc".into()))
        );
        fonts.example = Some("data/fonts.png".into());
        assert_eq!(
            fonts.example_source(),
            Some(MediaSource::Local(PathBuf::from("data/fonts.png")))
        );
    }
}
