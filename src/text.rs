//! Text rasterization for the overlay

use crate::error::*;
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::Path;

/// Coverage of a rendered string, cropped to its ink bounding box
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    /// Distance from the top of the line to the top of the ink
    pub top: i32,
    /// 0-255 per pixel, `width * height` long
    pub coverage: Vec<u8>,
}

impl TextMask {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.coverage[y * self.width + x]
    }
}

/// Something that can turn a string into a coverage mask
pub trait Typeface {
    fn render(&self, text: &str, px: f32) -> TextMask;
}

/// DejaVu Sans Mono, used when no other font is given
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// TrueType/OpenType font loaded once and shared by all frames
pub struct FontFace {
    font: Font,
}

impl FontFace {
    pub fn from_file(path: &Path) -> CatResult<Self> {
        let data = fs::read(path).map_err(|err| Error::Font(format!("{}: {}", path.display(), err)))?;
        Self::from_bytes(data).map_err(|err| match err {
            Error::Font(msg) => Error::Font(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn bundled() -> CatResult<Self> {
        Self::from_bytes(BUNDLED_FONT.to_vec())
    }

    pub fn from_bytes(data: Vec<u8>) -> CatResult<Self> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|msg| Error::Font(msg.to_string()))?;
        Ok(Self { font })
    }
}

impl Typeface for FontFace {
    fn render(&self, text: &str, px: f32) -> TextMask {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, px, 0));

        let glyphs: Vec<_> = layout.glyphs().iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .map(|g| (g.x.round() as i32, g.y.round() as i32, g))
            .collect();

        let left = match glyphs.iter().map(|&(x, ..)| x).min() {
            Some(left) => left,
            None => return TextMask::default(),
        };
        let top = glyphs.iter().map(|&(_, y, _)| y).min().unwrap_or(0);
        let right = glyphs.iter().map(|&(x, _, g)| x + g.width as i32).max().unwrap_or(left);
        let bottom = glyphs.iter().map(|&(_, y, g)| y + g.height as i32).max().unwrap_or(top);

        let width = (right - left) as usize;
        let height = (bottom - top) as usize;
        let mut coverage = vec![0u8; width * height];
        for &(x, y, g) in &glyphs {
            let (_, bitmap) = self.font.rasterize_config(g.key);
            let (ox, oy) = ((x - left) as usize, (y - top) as usize);
            for (row, src) in bitmap.chunks(g.width).enumerate().take(g.height) {
                let dst = &mut coverage[(oy + row) * width + ox..][..src.len()];
                // glyphs may overlap (kerning), keep the stronger coverage
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d = (*d).max(s);
                }
            }
        }

        TextMask { width, height, top, coverage }
    }
}
