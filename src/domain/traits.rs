//! # Domain Traits
//!
//! Abstract interfaces for the chat transport and for font rendering.
//! Allows for pluggable implementations in the Infrastructure layer.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

use crate::domain::error::RenderError;
use crate::domain::types::{Keyboard, MediaSource, Rgb};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a text message, optionally suggesting reply options
    async fn send_text(&self, content: &str, keyboard: &Keyboard) -> Result<(), String>;

    /// Send an image, either uploaded from disk or referenced by a server handle
    async fn send_photo(
        &self,
        source: &MediaSource,
        caption: Option<&str>,
        keyboard: &Keyboard,
    ) -> Result<(), String>;

    /// Send a local file as a downloadable attachment
    async fn send_document(&self, path: &Path, caption: Option<&str>) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Pixel metrics of one line of text at a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
    /// Distance below the baseline; negative or zero.
    pub descent: i32,
}

/// A loaded font able to measure and paint single lines.
pub trait Typeface: Send + Sync {
    fn measure(&self, text: &str, px: f32) -> TextExtent;

    /// Paints `text` with its layout box's top-left corner at `(x, y)`.
    fn draw(&self, canvas: &mut RgbaImage, text: &str, px: f32, x: f32, y: f32, color: Rgb);
}

/// Resolves font identifiers into typefaces.
pub trait FontSource: Send + Sync {
    fn typeface(&self, font: &str) -> Result<Arc<dyn Typeface>, RenderError>;
}
