//! # Catalogs
//!
//! Static lookup tables offered to the user: named colors and numbered fonts.
//! Both are built once at startup from configuration and never mutated.

use crate::domain::types::Rgb;

/// Named colors, kept in presentation order.
#[derive(Debug, Clone)]
pub struct ColorCatalog {
    entries: Vec<(String, Rgb)>,
}

impl ColorCatalog {
    pub fn new(entries: Vec<(String, Rgb)>) -> Self {
        Self { entries }
    }

    /// Case-insensitive lookup by display name.
    pub fn lookup(&self, name: &str) -> Option<Rgb> {
        let needle = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| n.to_lowercase() == needle)
            .map(|(_, rgb)| *rgb)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Rgb)> {
        self.entries.iter()
    }
}

impl Default for ColorCatalog {
    fn default() -> Self {
        let entries = [
            ("Белый", Rgb(255, 255, 255)),
            ("Чёрный", Rgb(0, 0, 0)),
            ("Красный", Rgb(255, 0, 0)),
            ("Синий", Rgb(0, 0, 255)),
            ("Зелёный", Rgb(0, 255, 0)),
            ("Жёлтый", Rgb(255, 255, 0)),
            ("Оранжевый", Rgb(255, 165, 0)),
            ("Фиолетовый", Rgb(128, 0, 128)),
            ("Розовый", Rgb(255, 0, 255)),
        ];
        Self::new(
            entries
                .into_iter()
                .map(|(n, rgb)| (n.to_string(), rgb))
                .collect(),
        )
    }
}

/// Font files addressed by a 1-based index.
#[derive(Debug, Clone)]
pub struct FontCatalog {
    files: Vec<String>,
    default: String,
}

impl FontCatalog {
    pub const MIN_INDEX: u32 = 1;

    /// Fails when the catalog is empty or does not contain the default font.
    pub fn new(files: Vec<String>, default: impl Into<String>) -> Result<Self, String> {
        let default = default.into();
        if files.is_empty() {
            return Err("font catalog is empty".to_string());
        }
        if !files.contains(&default) {
            return Err(format!("default font '{default}' is not in the font catalog"));
        }
        Ok(Self { files, default })
    }

    pub fn min_index(&self) -> u32 {
        Self::MIN_INDEX
    }

    pub fn max_index(&self) -> u32 {
        self.files.len() as u32
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        if index < self.min_index() || index > self.max_index() {
            return None;
        }
        self.files
            .get((index - Self::MIN_INDEX) as usize)
            .map(String::as_str)
    }

    pub fn default_font(&self) -> &str {
        &self.default
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lookup_ignores_case() {
        let catalog = ColorCatalog::default();
        assert_eq!(catalog.lookup("красный"), Some(Rgb(255, 0, 0)));
        assert_eq!(catalog.lookup("  СИНИЙ "), Some(Rgb(0, 0, 255)));
        assert_eq!(catalog.lookup("magenta"), None);
    }

    #[test]
    fn test_font_catalog_bounds() {
        let catalog =
            FontCatalog::new(vec!["a.ttf".into(), "b.ttf".into()], "a.ttf").unwrap();
        assert_eq!(catalog.min_index(), 1);
        assert_eq!(catalog.max_index(), 2);
        assert_eq!(catalog.get(0), None);
        assert_eq!(catalog.get(1), Some("a.ttf"));
        assert_eq!(catalog.get(2), Some("b.ttf"));
        assert_eq!(catalog.get(3), None);
    }

    #[test]
    fn test_font_catalog_rejects_unknown_default() {
        assert!(FontCatalog::new(vec!["a.ttf".into()], "z.ttf").is_err());
        assert!(FontCatalog::new(Vec::new(), "a.ttf").is_err());
    }
}
