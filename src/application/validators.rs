//! # Validators
//!
//! Pure parsers for the single fields a user types into the wizard:
//! sticker text, colors, font numbers and line-split patterns.

use regex::Regex;
use std::sync::LazyLock;

use crate::application::wizard::ServiceCommand;
use crate::domain::catalog::{ColorCatalog, FontCatalog};
use crate::domain::error::{WizardError, WizardResult};
use crate::domain::types::Rgb;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("integer pattern"));
static PICTOGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Extended_Pictographic}").expect("pictograph pattern"));

const REGIONAL_INDICATORS: std::ops::RangeInclusive<char> = '\u{1F1E6}'..='\u{1F1FF}';

/// Counts emoji-like symbols (pictographs and flag halves).
pub fn count_pictographs(text: &str) -> usize {
    PICTOGRAPH.find_iter(text).count()
        + text.chars().filter(|c| REGIONAL_INDICATORS.contains(c)).count()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Checks a candidate sticker text; the text itself is stored verbatim.
pub fn validate_text(candidate: &str) -> WizardResult<()> {
    if ServiceCommand::parse(candidate).is_some() {
        return Err(WizardError::UnsupportedCommandAtStep);
    }
    if count_pictographs(candidate) > 0 {
        return Err(WizardError::EmojiNotAllowed);
    }
    if word_count(candidate) == 0 {
        return Err(WizardError::EmptyText);
    }
    Ok(())
}

/// Every signed integer in `input`, or `None` if one does not fit an `i64`.
fn integers(input: &str) -> Option<Vec<i64>> {
    INTEGER
        .find_iter(input)
        .map(|m| m.as_str().parse::<i64>().ok())
        .collect()
}

/// Accepts a catalog color name or exactly three integers in `0..=255`.
pub fn parse_color(input: &str, colors: &ColorCatalog) -> WizardResult<Rgb> {
    if let Some(rgb) = colors.lookup(input) {
        return Ok(rgb);
    }

    let values = integers(input).ok_or(WizardError::InvalidColorCode)?;
    let channels: Vec<u8> = values
        .into_iter()
        .map(u8::try_from)
        .collect::<Result<_, _>>()
        .map_err(|_| WizardError::InvalidColorCode)?;

    match channels.as_slice() {
        [r, g, b] => Ok(Rgb(*r, *g, *b)),
        _ => Err(WizardError::InvalidColorCode),
    }
}

/// Resolves a font number into its catalog entry.
pub fn parse_font_index<'a>(input: &str, fonts: &'a FontCatalog) -> WizardResult<&'a str> {
    let invalid = WizardError::InvalidFontIndex {
        min: fonts.min_index(),
        max: fonts.max_index(),
    };
    let index: u32 = input.trim().parse().map_err(|_| invalid.clone())?;
    fonts.get(index).ok_or(invalid)
}

/// One line per word.
pub fn default_split_pattern(text: &str) -> Vec<u32> {
    vec![1; word_count(text)]
}

/// Accepts any sequence of positive integers with the same sum as `current`.
///
/// Only the sum is compared, so the number of lines is free to change.
pub fn parse_split_pattern(input: &str, current: &[u32]) -> WizardResult<Vec<u32>> {
    let values = integers(input).ok_or(WizardError::InvalidSplitPattern)?;
    let pattern: Vec<u32> = values
        .into_iter()
        .map(|v| u32::try_from(v).ok().filter(|v| *v > 0))
        .collect::<Option<_>>()
        .ok_or(WizardError::InvalidSplitPattern)?;

    let expected: u64 = current.iter().map(|v| u64::from(*v)).sum();
    let actual: u64 = pattern.iter().map(|v| u64::from(*v)).sum();
    if pattern.is_empty() || actual != expected {
        return Err(WizardError::InvalidSplitPattern);
    }
    Ok(pattern)
}

/// Groups the words of `text` into lines of `pattern[i]` words each.
pub fn split_into_lines(text: &str, pattern: &[u32]) -> Vec<String> {
    let mut words = text.split_whitespace();
    pattern
        .iter()
        .map(|count| {
            words
                .by_ref()
                .take(*count as usize)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Renders a pattern the way it is shown to the user: `1, 2, 1`.
pub fn format_split_pattern(pattern: &[u32]) -> String {
    pattern
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
