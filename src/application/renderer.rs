//! # Sticker Renderer
//!
//! Fits a set of text lines into the square text area of the canvas and paints them.
//!
//! The font size is searched against the line with the most characters: starting from
//! an overshooting estimate it grows or shrinks one pixel at a time until that line just
//! fits the text-area width, then shrinks further until the stacked lines fit its height.
//! One pixel of safety margin is taken off the result.

use image::RgbaImage;
use std::sync::Arc;

use crate::domain::error::RenderError;
use crate::domain::traits::{FontSource, TextExtent, Typeface};
use crate::domain::types::{RenderSpec, Rgb};

/// Upper bound of the size search, as a multiple of the text-area side.
const MAX_SIZE_FACTOR: u32 = 4;

pub struct Renderer {
    fonts: Arc<dyn FontSource>,
    margin: u32,
    overshoot_factor: f32,
}

impl Renderer {
    pub fn new(fonts: Arc<dyn FontSource>, margin: u32, overshoot_factor: f32) -> Self {
        Self {
            fonts,
            margin,
            overshoot_factor,
        }
    }

    pub fn render(&self, spec: &RenderSpec) -> Result<RgbaImage, RenderError> {
        if spec.lines.is_empty() {
            return Err(RenderError::EmptyText);
        }
        let face = self.fonts.typeface(&spec.font)?;

        let area_width = spec.width.saturating_sub(2 * self.margin).max(1);
        let area_height = spec.height.saturating_sub(2 * self.margin).max(1);
        let size = fit_font_size(
            face.as_ref(),
            &spec.lines,
            area_width,
            area_height,
            self.overshoot_factor,
        )?;
        tracing::debug!(
            "Fitted {} line(s) of '{}' at {}px",
            spec.lines.len(),
            spec.font,
            size
        );

        let mut canvas =
            RgbaImage::from_pixel(spec.width, spec.height, spec.background_color.to_rgba());
        paint_lines(&mut canvas, face.as_ref(), &spec.lines, size, spec.font_color);
        Ok(canvas)
    }
}

/// Space left under a line before the next one starts.
fn line_gap(extent: &TextExtent) -> u32 {
    extent.descent.unsigned_abs().max(extent.height / 5)
}

/// Total height of all lines, each followed by its gap.
pub fn stacked_height(face: &dyn Typeface, lines: &[String], size: u32) -> u32 {
    lines
        .iter()
        .map(|line| {
            let extent = face.measure(line, size as f32);
            extent.height + line_gap(&extent)
        })
        .sum()
}

/// Largest font size (minus one) at which every line fits the text area.
pub fn fit_font_size(
    face: &dyn Typeface,
    lines: &[String],
    area_width: u32,
    area_height: u32,
    overshoot_factor: f32,
) -> Result<u32, RenderError> {
    // first of the longest lines
    let reference = lines
        .iter()
        .rev()
        .max_by_key(|line| line.chars().count())
        .ok_or(RenderError::EmptyText)?;
    let chars = reference.chars().count();
    if chars == 0 {
        return Err(RenderError::EmptyText);
    }

    let max_size = area_width.max(area_height) * MAX_SIZE_FACTOR;
    let estimate = (area_width as f32 / chars as f32 * overshoot_factor).floor() as u32;
    let mut size = estimate.clamp(1, max_size);

    let (mut grew, mut shrank) = (false, false);
    while !(grew && shrank) {
        let width = face.measure(reference, size as f32).width;
        if width < area_width {
            if size >= max_size {
                break;
            }
            size += 1;
            grew = true;
        } else if width > area_width {
            if size <= 1 {
                break;
            }
            size -= 1;
            shrank = true;
        } else {
            break;
        }
    }

    while size > 1 && stacked_height(face, lines, size) > area_height {
        size -= 1;
    }

    Ok(size.saturating_sub(1).max(1))
}

/// Paints the lines centered on the canvas, top to bottom.
pub fn paint_lines(
    canvas: &mut RgbaImage,
    face: &dyn Typeface,
    lines: &[String],
    size: u32,
    color: Rgb,
) {
    let px = size as f32;
    let extents: Vec<TextExtent> = lines.iter().map(|l| face.measure(l, px)).collect();
    let Some(first) = extents.first() else {
        return;
    };

    let total: u32 = extents.iter().map(|e| e.height + line_gap(e)).sum();
    let first_descent = first.descent.unsigned_abs();
    let mut y = (canvas.height() as f32 - total as f32 - first_descent as f32) / 2.0;

    for (line, extent) in lines.iter().zip(&extents) {
        let x = (canvas.width() as f32 - extent.width as f32) / 2.0;
        face.draw(canvas, line, px, x, y, color);
        y += (extent.height + line_gap(extent)) as f32;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{BlockFace, BlockFonts};
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn spec(items: &[&str]) -> RenderSpec {
        RenderSpec {
            lines: lines(items),
            font: "block.ttf".into(),
            font_color: Rgb(200, 10, 10),
            background_color: Rgb(10, 200, 10),
            width: 512,
            height: 512,
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(Arc::new(BlockFonts::new(&["block.ttf"])), 10, 1.5)
    }

    #[test]
    fn test_single_line_fills_width() {
        let text = lines(&["foo"]);
        let size = fit_font_size(&BlockFace, &text, 492, 492, 1.5).unwrap();
        assert!(BlockFace.measure("foo", size as f32).width <= 492);
        assert!(BlockFace.measure("foo", (size + 2) as f32).width > 492);
    }

    #[test]
    fn test_search_from_above_converges() {
        // a large overshoot starts well past the fitting size
        let text = lines(&["abcdef"]);
        let size = fit_font_size(&BlockFace, &text, 492, 492, 5.0).unwrap();
        assert!(BlockFace.measure("abcdef", size as f32).width <= 492);
        assert!(BlockFace.measure("abcdef", (size + 2) as f32).width > 492);
    }

    #[test]
    fn test_many_lines_shrink_to_fit_height() {
        let text = lines(&["a"; 8]);
        let size = fit_font_size(&BlockFace, &text, 492, 492, 1.5).unwrap();
        assert!(stacked_height(&BlockFace, &text, size) <= 492);
        assert!(stacked_height(&BlockFace, &text, size + 2) > 492);
    }

    #[test]
    fn test_reference_is_longest_line() {
        let text = lines(&["a", "abcdefgh", "abc"]);
        let size = fit_font_size(&BlockFace, &text, 492, 492, 1.5).unwrap();
        assert!(BlockFace.measure("abcdefgh", size as f32).width <= 492);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            fit_font_size(&BlockFace, &[], 492, 492, 1.5),
            Err(RenderError::EmptyText)
        ));
        assert!(matches!(
            fit_font_size(&BlockFace, &lines(&[""]), 492, 492, 1.5),
            Err(RenderError::EmptyText)
        ));
        assert!(matches!(
            renderer().render(&spec(&[])),
            Err(RenderError::EmptyText)
        ));
    }

    #[test]
    fn test_unknown_font() {
        let mut s = spec(&["foo"]);
        s.font = "missing.ttf".into();
        assert!(matches!(
            renderer().render(&s),
            Err(RenderError::FontNotFound(name)) if name == "missing.ttf"
        ));
    }

    #[test]
    fn test_canvas_size_and_colors() {
        let image = renderer().render(&spec(&["foo bar"])).unwrap();
        assert_eq!((image.width(), image.height()), (512, 512));
        assert_eq!(*image.get_pixel(0, 0), Rgb(10, 200, 10).to_rgba());
        assert_eq!(*image.get_pixel(511, 511), Rgb(10, 200, 10).to_rgba());
        let painted = image
            .pixels()
            .filter(|p| **p == Rgb(200, 10, 10).to_rgba())
            .count();
        assert!(painted > 0);
    }

    #[test]
    fn test_text_is_centered_horizontally() {
        let image = renderer().render(&spec(&["foo"])).unwrap();
        let ink = Rgb(200, 10, 10).to_rgba();
        let xs: Vec<u32> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == ink)
            .map(|(x, _, _)| x)
            .collect();
        let (min, max) = (*xs.iter().min().unwrap(), *xs.iter().max().unwrap());
        let left_space = min as i64;
        let right_space = 511 - max as i64;
        assert!((left_space - right_space).abs() <= 2);
        assert!(min >= 10 && max <= 501);
    }

    #[test]
    fn test_lines_are_stacked_top_to_bottom() {
        let image = renderer().render(&spec(&["ab", "cd"])).unwrap();
        let ink = Rgb(200, 10, 10).to_rgba();
        let rows: Vec<u32> = (0..512)
            .filter(|y| (0..512).any(|x| *image.get_pixel(x, *y) == ink))
            .collect();
        // two separate bands of ink
        let breaks = rows.windows(2).filter(|w| w[1] != w[0] + 1).count();
        assert_eq!(breaks, 1);
    }
}
