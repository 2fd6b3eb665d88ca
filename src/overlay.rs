//! Flattens source frames and draws the username on them

use crate::error::*;
use crate::progress::ProgressReporter;
use crate::text::{TextMask, Typeface};
use crate::{SourceFrame, StampedFrame};
use imgref::*;
use rgb::*;

/// What to write on every frame, and how
#[derive(Clone, Debug)]
pub struct Overlay {
    pub text: String,
    /// Font size in pixels
    pub font_size: f32,
    pub fill: RGBA8,
    /// Drop shadow drawn under the text
    pub shadow: RGBA8,
    pub shadow_offset: (i32, i32),
    /// The top of the text line is this many pixels above the bottom edge
    pub bottom_band: u32,
    /// Transparent source pixels are flattened onto this color
    pub background: RGB8,
}

impl Overlay {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 70.,
            fill: RGBA8::new(255, 255, 255, 255),
            shadow: RGBA8::new(0, 0, 0, 128),
            shadow_offset: (2, 2),
            bottom_band: 160,
            background: RGB8::new(255, 255, 255),
        }
    }
}

/// Composites `image` onto a solid `background`. The result is fully opaque.
pub fn flatten(image: &mut ImgVec<RGBA8>, background: RGB8) {
    for row in image.rows_mut() {
        for px in row.iter_mut() {
            let a = u16::from(px.a);
            let mix = |fg: u8, bg: u8| ((u16::from(fg) * a + u16::from(bg) * (255 - a) + 127) / 255) as u8;
            *px = RGBA8::new(mix(px.r, background.r), mix(px.g, background.g), mix(px.b, background.b), 255);
        }
    }
}

/// Where the left edge and the line top of a `text_width` wide text go.
///
/// The text is centered horizontally, and may start off-canvas if it's wider than the frame.
pub fn text_origin(canvas_width: usize, canvas_height: usize, text_width: usize, overlay: &Overlay) -> (i32, i32) {
    let x = (canvas_width as i32 - text_width as i32).div_euclid(2);
    let y = canvas_height as i32 - overlay.bottom_band as i32;
    (x, y)
}

/// Draws the shadow, then the text on top of it
pub fn stamp(image: &mut ImgVec<RGBA8>, mask: &TextMask, overlay: &Overlay) {
    if mask.is_empty() {
        return;
    }
    let (x, y) = text_origin(image.width(), image.height(), mask.width, overlay);
    let top = y + mask.top;
    let (dx, dy) = overlay.shadow_offset;
    blend_mask(image, mask, x + dx, top + dy, overlay.shadow);
    blend_mask(image, mask, x, top, overlay.fill);
}

/// Source-over blend of `color`, with alpha scaled by coverage. Clipped to the image.
fn blend_mask(image: &mut ImgVec<RGBA8>, mask: &TextMask, left: i32, top: i32, color: RGBA8) {
    if color.a == 0 {
        return;
    }
    let (width, height) = (image.width() as i32, image.height() as i32);
    let stride = image.stride();
    let buf = image.buf_mut();
    for my in 0..mask.height {
        let py = top + my as i32;
        if py < 0 || py >= height {
            continue;
        }
        let row = &mut buf[py as usize * stride..][..width as usize];
        for mx in 0..mask.width {
            let px = left + mx as i32;
            if px < 0 || px >= width {
                continue;
            }
            let alpha = u32::from(mask.get(mx, my)) * u32::from(color.a) / 255;
            if alpha == 0 {
                continue;
            }
            let dst = &mut row[px as usize];
            let mix = |src: u8, dst: u8| ((u32::from(src) * alpha + u32::from(dst) * (255 - alpha) + 127) / 255) as u8;
            *dst = RGBA8::new(mix(color.r, dst.r), mix(color.g, dst.g), mix(color.b, dst.b), dst.a.max(alpha as u8));
        }
    }
}

/// Flattens and stamps every frame, in source order.
///
/// The text is rasterized once, since it doesn't change between frames.
pub fn composite(frames: Vec<SourceFrame>, typeface: &dyn Typeface, overlay: &Overlay, reporter: &mut dyn ProgressReporter) -> CatResult<Vec<StampedFrame>> {
    let mask = typeface.render(&overlay.text, overlay.font_size);
    log::debug!("text '{}' is {}×{}px", overlay.text, mask.width, mask.height);
    reporter.total_frames(frames.len() as u64);

    let mut stamped = Vec::with_capacity(frames.len());
    for (n, SourceFrame { mut image, duration_ms }) in frames.into_iter().enumerate() {
        flatten(&mut image, overlay.background);
        stamp(&mut image, &mask, overlay);
        log::debug!("frame {} stamped, {}ms", n + 1, duration_ms);
        stamped.push(StampedFrame { image, duration_ms });
        if !reporter.increase() {
            return Err(Error::Aborted);
        }
    }
    Ok(stamped)
}
