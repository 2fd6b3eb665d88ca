/*
 gifstamp, username overlays for animated GIFs
 built on the gifski pngquant-based GIF encoder © 2017 Kornel Lesiński

 This program is free software: you can redistribute it and/or modify
 it under the terms of the GNU Affero General Public License as
 published by the Free Software Foundation, either version 3 of the
 License, or (at your option) any later version.

 This program is distributed in the hope that it will be useful,
 but WITHOUT ANY WARRANTY; without even the implied warranty of
 MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 GNU Affero General Public License for more details.

 You should have received a copy of the GNU Affero General Public License
 along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

#[macro_use] extern crate quick_error;

use imgref::*;
use rgb::*;

mod error;
pub use crate::error::*;
pub mod progress;
pub mod text;
mod decode;
pub use crate::decode::*;
mod overlay;
pub use crate::overlay::*;
mod quantize;
pub use crate::quantize::PaletteMode;
mod encoderust;
mod fetch;
pub use crate::fetch::*;
mod upload;
pub use crate::upload::*;
mod pipeline;
pub use crate::pipeline::*;

use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

/// Palette index that every written frame declares as transparent.
///
/// No opaque pixel is ever mapped to it.
pub const TRANSPARENT_INDEX: u8 = 100;

/// Duration used for source frames that don't specify one
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Palette conversion settings for `write_animation()`
#[derive(Copy, Clone, Debug)]
pub struct Settings {
    /// One palette for the whole animation, or one per frame
    pub palette: PaletteMode,
    /// 1-100
    pub quality: u8,
    /// Lower quality, but faster quantization
    pub fast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette: PaletteMode::Global,
            quality: 100,
            fast: false,
        }
    }
}

/// A source frame with the overlay already drawn on it. Always fully opaque.
#[derive(Clone, Debug)]
pub struct StampedFrame {
    pub image: ImgVec<RGBA8>,
    pub duration_ms: u32,
}

/// Frame after palette conversion
pub(crate) struct GIFFrame {
    image: ImgVec<u8>,
    pal: Vec<RGBA8>,
    duration_ms: u32,
}

trait Encoder {
    fn write_frame(&mut self, frame: &GIFFrame, delay: u16) -> CatResult<()>;
    fn finish(&mut self) -> CatResult<()> {
        Ok(())
    }
}

/// Writes a looping GIF with every frame disposed to background.
///
/// `writer` can be any writer, such as `File` or `&mut Vec`.
/// Durations are passed through unchanged (rounded to the GIF's 10ms units).
pub fn write_animation<W: Write>(frames: &[StampedFrame], writer: W, settings: &Settings) -> CatResult<()> {
    let first = frames.first().ok_or(Error::NoFrames)?;
    let (width, height) = (first.image.width(), first.image.height());
    if width > usize::from(u16::MAX) || height > usize::from(u16::MAX) {
        return Err(Error::WrongSize(format!("{}×{} is too large for a GIF", width, height)));
    }

    let gif_frames = quantize::palettize(frames, settings)?;
    let mut enc = encoderust::RustEncoder::new(writer, width as u16, height as u16)?;
    for frame in &gif_frames {
        enc.write_frame(frame, delay_for_duration(frame.duration_ms))?;
    }
    enc.finish()?;
    log::debug!("wrote {} frames of {}×{}", gif_frames.len(), width, height);
    Ok(())
}

/// Same as `write_animation()`, but to a new file at `path`.
///
/// Nothing is created when there are no frames.
pub fn encode_to_file(frames: &[StampedFrame], path: &Path, settings: &Settings) -> CatResult<()> {
    if frames.is_empty() {
        return Err(Error::NoFrames);
    }
    let file = File::create(path)?;
    write_animation(frames, BufWriter::new(file), settings)
}

/// GIF delays are in 1/100s
fn delay_for_duration(duration_ms: u32) -> u16 {
    (duration_ms.saturating_add(5) / 10).max(1).min(u32::from(u16::MAX)) as u16
}
