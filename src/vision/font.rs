//! Bitmap fonts
//!
//! A font is a read-only set of glyph templates, one grayscale bitmap per
//! character. Fonts are loaded once from disk and handed to the recognizer by
//! reference; nothing mutates them afterwards.

use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while loading glyph bitmaps
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode glyph {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no glyphs found under {0:?}")]
    Empty(PathBuf),
}

/// Named interface text styles, each with its own bitmap set
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Small interface text (orbs, plugin overlays)
    Plain11,
    /// Chatbox text, medium interface text
    #[default]
    Plain12,
    /// Main text, mouseover text, overhead chat
    Bold12,
    /// Large bold quest text
    Quill,
    /// Small quest text
    Quill8,
}

impl FontStyle {
    pub const ALL: [FontStyle; 5] = [
        FontStyle::Plain11,
        FontStyle::Plain12,
        FontStyle::Bold12,
        FontStyle::Quill,
        FontStyle::Quill8,
    ];

    /// Directory holding this style's bitmaps, relative to the fonts root
    pub fn dir_name(&self) -> &'static str {
        match self {
            FontStyle::Plain11 => "Plain11",
            FontStyle::Plain12 => "Plain12",
            FontStyle::Bold12 => "Bold12",
            FontStyle::Quill => "Quill",
            FontStyle::Quill8 => "Quill8",
        }
    }
}

/// Glyph templates of one font style, keyed by character
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    glyphs: BTreeMap<char, GrayImage>,
}

impl Font {
    /// Build a font from in-memory glyphs. A space glyph is dropped since
    /// whitespace has no pixels to match.
    pub fn from_glyphs(name: &str, glyphs: impl IntoIterator<Item = (char, GrayImage)>) -> Self {
        let glyphs = glyphs
            .into_iter()
            .filter(|(ch, _)| *ch != ' ')
            .collect();

        Self {
            name: name.to_string(),
            glyphs,
        }
    }

    /// Load every `*.bmp` below `dir` whose file stem is a decimal Unicode
    /// code point (`65.bmp` is 'A').
    pub fn load_dir(dir: &Path) -> Result<Self, FontError> {
        let mut files = Vec::new();
        collect_bitmaps(dir, &mut files)?;

        let mut glyphs = Vec::with_capacity(files.len());
        for path in files {
            let Some(ch) = glyph_char(&path) else {
                warn!("Ignoring glyph file with non code point name: {:?}", path);
                continue;
            };

            let image = image::open(&path)
                .map_err(|source| FontError::Decode {
                    path: path.clone(),
                    source,
                })?
                .to_luma8();
            glyphs.push((ch, image));
        }

        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let font = Self::from_glyphs(name, glyphs);

        if font.is_empty() {
            return Err(FontError::Empty(dir.to_path_buf()));
        }

        debug!("Loaded font '{}' with {} glyphs", font.name, font.len());
        Ok(font)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template for a character
    pub fn glyph(&self, ch: char) -> Option<&GrayImage> {
        self.glyphs.get(&ch)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Characters in code point order
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

fn collect_bitmaps(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), FontError> {
    let io_err = |source| FontError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_bitmaps(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("bmp"))
        {
            out.push(path);
        }
    }

    Ok(())
}

fn glyph_char(path: &Path) -> Option<char> {
    let stem = path.file_stem()?.to_str()?;
    char::from_u32(stem.parse().ok()?)
}

/// All font styles available to the process, loaded once at startup
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<FontStyle, Font>,
}

impl FontRegistry {
    /// Load each style that has a directory under `root`
    pub fn load(root: &Path) -> Result<Self, FontError> {
        let mut fonts = HashMap::new();

        for style in FontStyle::ALL {
            let dir = root.join(style.dir_name());
            if !dir.is_dir() {
                debug!("No bitmaps for {:?} at {:?}", style, dir);
                continue;
            }
            fonts.insert(style, Font::load_dir(&dir)?);
        }

        if fonts.is_empty() {
            return Err(FontError::Empty(root.to_path_buf()));
        }

        info!("Loaded {} font style(s) from {:?}", fonts.len(), root);
        Ok(Self { fonts })
    }

    pub fn get(&self, style: FontStyle) -> Option<&Font> {
        self.fonts.get(&style)
    }

    /// Loaded styles, sorted
    pub fn styles(&self) -> Vec<FontStyle> {
        let mut styles: Vec<_> = self.fonts.keys().copied().collect();
        styles.sort();
        styles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use tempfile::TempDir;

    fn glyph(value: u8) -> GrayImage {
        GrayImage::from_pixel(3, 4, Luma([value]))
    }

    #[test]
    fn test_from_glyphs_drops_space() {
        let font = Font::from_glyphs("test", [('A', glyph(255)), (' ', glyph(0))]);
        assert_eq!(font.len(), 1);
        assert!(font.contains('A'));
        assert!(!font.contains(' '));
    }

    #[test]
    fn test_chars_in_code_point_order() {
        let font = Font::from_glyphs("test", [('b', glyph(1)), ('A', glyph(2)), ('a', glyph(3))]);
        let chars: String = font.chars().collect();
        assert_eq!(chars, "Aab");
    }

    #[test]
    fn test_load_dir_reads_code_point_stems() {
        let dir = TempDir::new().unwrap();
        let font_dir = dir.path().join("Plain12");
        std::fs::create_dir_all(font_dir.join("upper")).unwrap();

        let mut a = GrayImage::new(3, 4);
        a.put_pixel(1, 1, Luma([255]));
        a.save(font_dir.join("upper").join("65.bmp")).unwrap();
        glyph(255).save(font_dir.join("49.bmp")).unwrap();
        glyph(255).save(font_dir.join("32.bmp")).unwrap();
        glyph(255).save(font_dir.join("notes.bmp")).unwrap();
        std::fs::write(font_dir.join("README.txt"), "not a glyph").unwrap();

        let font = Font::load_dir(&font_dir).unwrap();
        assert_eq!(font.name(), "Plain12");
        assert_eq!(font.chars().collect::<String>(), "1A");

        let loaded = font.glyph('A').unwrap();
        assert_eq!(loaded.dimensions(), (3, 4));
        assert_eq!(loaded.get_pixel(1, 1).0[0], 255);
        assert_eq!(loaded.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_load_dir_empty() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Font::load_dir(dir.path()),
            Err(FontError::Empty(_))
        ));
    }

    #[test]
    fn test_load_dir_missing() {
        assert!(matches!(
            Font::load_dir(Path::new("/nonexistent/fonts/Plain12")),
            Err(FontError::Io { .. })
        ));
    }

    #[test]
    fn test_registry_loads_available_styles() {
        let dir = TempDir::new().unwrap();
        for style in [FontStyle::Bold12, FontStyle::Quill8] {
            let font_dir = dir.path().join(style.dir_name());
            std::fs::create_dir_all(&font_dir).unwrap();
            glyph(255).save(font_dir.join("88.bmp")).unwrap();
        }

        let registry = FontRegistry::load(dir.path()).unwrap();
        assert_eq!(registry.styles(), vec![FontStyle::Bold12, FontStyle::Quill8]);
        assert!(registry.get(FontStyle::Bold12).unwrap().contains('X'));
        assert!(registry.get(FontStyle::Plain12).is_none());
    }

    #[test]
    fn test_registry_without_fonts() {
        let dir = TempDir::new().unwrap();
        assert!(FontRegistry::load(dir.path()).is_err());
    }
}
