//! # Domain Types
//!
//! Common data structures shared by the wizard, the renderer and the transport:
//! colors, the sticker draft, the renderer input and the outbound directives.

use std::path::PathBuf;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.0, self.1, self.2, 255])
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Rgb(value[0], value[1], value[2])
    }
}

/// Sticker parameters collected across the wizard steps.
///
/// Once `split_pattern` is set, its sum equals the word count of `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerDraft {
    pub text: Option<String>,
    pub split_pattern: Option<Vec<u32>>,
    pub font: String,
    pub font_color: Rgb,
    pub background_color: Rgb,
}

impl StickerDraft {
    pub fn new(default_font: impl Into<String>) -> Self {
        Self {
            text: None,
            split_pattern: None,
            font: default_font.into(),
            font_color: Rgb::BLACK,
            background_color: Rgb::WHITE,
        }
    }
}

/// Finalized renderer input, built once from a complete draft.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub lines: Vec<String>,
    pub font: String,
    pub font_color: Rgb,
    pub background_color: Rgb,
    pub width: u32,
    pub height: u32,
}

/// Reply keyboard suggested alongside a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    #[default]
    None,
    YesNo,
    FontIndices { min: u32, max: u32 },
    ColorNames(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A file on local disk, uploaded on send.
    Local(PathBuf),
    /// A handle already known to the chat server (e.g. an `mxc://` URI).
    Remote(String),
}

/// One unit of outbound response, delivered in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Text {
        text: String,
        keyboard: Keyboard,
    },
    Photo {
        source: MediaSource,
        caption: Option<String>,
        keyboard: Keyboard,
    },
    Document {
        path: PathBuf,
        caption: Option<String>,
    },
    CloseSession,
}

impl Directive {
    pub fn text(text: impl Into<String>) -> Self {
        Directive::Text {
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn text_with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Directive::Text {
            text: text.into(),
            keyboard,
        }
    }

    /// Text content of a text directive or the caption of an attachment.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Directive::Text { text, .. } => Some(text),
            Directive::Photo { caption, .. } | Directive::Document { caption, .. } => {
                caption.as_deref()
            }
            Directive::CloseSession => None,
        }
    }
}
