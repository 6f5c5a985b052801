//! # Font Directory
//!
//! Loads TrueType/OpenType files from the configured fonts directory with `fontdue`
//! and implements the renderer's `Typeface` on top of them. Parsed fonts are cached
//! by file name for the lifetime of the process.

use fontdue::{Font, FontSettings};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::domain::error::RenderError;
use crate::domain::traits::{FontSource, TextExtent, Typeface};
use crate::domain::types::Rgb;

pub struct FontdueTypeface {
    font: Font,
}

impl FontdueTypeface {
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|reason| {
            RenderError::FontLoad {
                font: name.to_string(),
                reason: reason.to_string(),
            }
        })?;
        Ok(Self { font })
    }

    /// Ascent and (negative) descent of a line at `px`.
    fn line_bounds(&self, px: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(px) {
            Some(metrics) => (metrics.ascent, metrics.descent),
            None => (px * 0.8, -px * 0.2),
        }
    }

    fn advance(&self, text: &str, px: f32) -> f32 {
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            if let Some(prev) = previous {
                width += self.font.horizontal_kern(prev, ch, px).unwrap_or(0.0);
            }
            width += self.font.metrics(ch, px).advance_width;
            previous = Some(ch);
        }
        width
    }
}

impl Typeface for FontdueTypeface {
    fn measure(&self, text: &str, px: f32) -> TextExtent {
        let (ascent, descent) = self.line_bounds(px);
        TextExtent {
            width: self.advance(text, px).ceil().max(0.0) as u32,
            height: (ascent - descent).ceil().max(0.0) as u32,
            descent: descent.floor() as i32,
        }
    }

    fn draw(&self, canvas: &mut RgbaImage, text: &str, px: f32, x: f32, y: f32, color: Rgb) {
        let (ascent, _) = self.line_bounds(px);
        let baseline = y + ascent;
        let mut pen = x;
        let mut previous = None;

        for ch in text.chars() {
            if let Some(prev) = previous {
                pen += self.font.horizontal_kern(prev, ch, px).unwrap_or(0.0);
            }
            let (metrics, coverage) = self.font.rasterize(ch, px);
            let left = (pen + metrics.xmin as f32).round() as i64;
            let top = (baseline - (metrics.ymin as f32 + metrics.height as f32)).round() as i64;
            blend_coverage(
                canvas,
                left,
                top,
                metrics.width,
                metrics.height,
                &coverage,
                color,
            );
            pen += metrics.advance_width;
            previous = Some(ch);
        }
    }
}

/// Alpha-blends a glyph coverage bitmap onto the canvas, clipping at the edges.
fn blend_coverage(
    canvas: &mut RgbaImage,
    left: i64,
    top: i64,
    width: usize,
    height: usize,
    coverage: &[u8],
    color: Rgb,
) {
    let (canvas_w, canvas_h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for row in 0..height {
        let py = top + row as i64;
        if py < 0 || py >= canvas_h {
            continue;
        }
        for col in 0..width {
            let px = left + col as i64;
            if px < 0 || px >= canvas_w {
                continue;
            }
            let alpha = f32::from(coverage[row * width + col]) / 255.0;
            if alpha <= 0.0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            let src = [color.0, color.1, color.2];
            for (channel, value) in dst.0.iter_mut().take(3).zip(src) {
                let mixed = f32::from(*channel) * (1.0 - alpha) + f32::from(value) * alpha;
                *channel = mixed.round().clamp(0.0, 255.0) as u8;
            }
            dst.0[3] = 255;
        }
    }
}

/// Resolves font file names inside one directory.
pub struct FontDirectory {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Arc<FontdueTypeface>>>,
}

impl FontDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Loads every font up front so a broken file is reported at startup.
    pub fn preload(&self, names: &[String]) -> Result<(), RenderError> {
        for name in names {
            self.typeface(name)?;
        }
        Ok(())
    }
}

impl FontSource for FontDirectory {
    fn typeface(&self, font: &str) -> Result<Arc<dyn Typeface>, RenderError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(face) = cache.get(font) {
            return Ok(face.clone());
        }

        let path = self.dir.join(font);
        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::FontNotFound(font.to_string())
            } else {
                RenderError::FontLoad {
                    font: font.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        let face = Arc::new(FontdueTypeface::from_bytes(font, bytes)?);
        tracing::debug!("Loaded font {}", path.display());
        cache.insert(font.to_string(), face.clone());
        Ok(face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_font_file() {
        let dir = TempDir::new().unwrap();
        let fonts = FontDirectory::new(dir.path());
        assert!(matches!(
            fonts.typeface("nope.ttf"),
            Err(RenderError::FontNotFound(name)) if name == "nope.ttf"
        ));
    }

    #[test]
    fn test_corrupt_font_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.ttf"), b"not a font").unwrap();
        let fonts = FontDirectory::new(dir.path());
        assert!(matches!(
            fonts.preload(&["broken.ttf".to_string()]),
            Err(RenderError::FontLoad { .. })
        ));
    }

    #[test]
    fn test_blend_coverage_clips_and_mixes() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgb::WHITE.to_rgba());
        // 2x2 glyph placed one pixel up-left: only its bottom-right cell lands
        blend_coverage(&mut canvas, -1, -1, 2, 2, &[255, 255, 255, 255], Rgb::BLACK);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb::BLACK.to_rgba());
        assert_eq!(*canvas.get_pixel(1, 1), Rgb::WHITE.to_rgba());

        blend_coverage(&mut canvas, 1, 1, 1, 1, &[128], Rgb::BLACK);
        let mixed = canvas.get_pixel(1, 1).0;
        assert!(mixed[0] > 100 && mixed[0] < 150);
        assert_eq!(mixed[3], 255);
    }
}
