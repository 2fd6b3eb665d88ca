use crate::error::*;
use crate::{GIFFrame, Settings, StampedFrame, TRANSPARENT_INDEX};
use imagequant::*;
use imgref::*;
use rgb::*;
use std::str::FromStr;

/// How palettes are shared between frames
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaletteMode {
    /// A single adaptive palette computed from all frames at once
    Global,
    /// Every frame gets its own adaptive palette. Colors may flicker between frames.
    PerFrame,
}

impl FromStr for PaletteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(PaletteMode::Global),
            "per-frame" => Ok(PaletteMode::PerFrame),
            other => Err(format!("unknown palette mode '{}'", other)),
        }
    }
}

pub(crate) fn palettize(frames: &[StampedFrame], settings: &Settings) -> CatResult<Vec<GIFFrame>> {
    let (width, height) = match frames.first() {
        Some(f) => (f.image.width(), f.image.height()),
        None => return Err(Error::NoFrames),
    };
    for (n, f) in frames.iter().enumerate() {
        if f.image.width() != width || f.image.height() != height {
            return Err(Error::WrongSize(format!("Frame {} has wrong size ({}×{}, expected {}×{})", n + 1,
                f.image.width(), f.image.height(), width, height)));
        }
    }

    match settings.palette {
        PaletteMode::PerFrame => frames.iter().map(|f| {
            let (image, pal) = quantize(f.image.as_ref(), settings)?;
            Ok(GIFFrame { image, pal, duration_ms: f.duration_ms })
        }).collect(),
        PaletteMode::Global => {
            // all frames stacked into one tall image, remapped once with one palette
            let mut sheet = Vec::with_capacity(width * height * frames.len());
            for row in frames.iter().flat_map(|f| f.image.rows()) {
                sheet.extend_from_slice(row);
            }
            let sheet = ImgVec::new(sheet, width, height * frames.len());
            let (indexed, pal) = quantize(sheet.as_ref(), settings)?;

            Ok(indexed.buf().chunks(width * height).zip(frames).map(|(chunk, f)| GIFFrame {
                image: Img::new(chunk.to_vec(), width, height),
                pal: pal.clone(),
                duration_ms: f.duration_ms,
            }).collect())
        },
    }
}

fn quantize(image: ImgRef<'_, RGBA8>, settings: &Settings) -> CatResult<(ImgVec<u8>, Vec<RGBA8>)> {
    let mut liq = Attributes::new();
    if settings.fast {
        liq.set_speed(10);
    }
    liq.set_quality(0, settings.quality.into());
    // one slot is kept for the transparent entry
    liq.set_max_colors(255);
    let mut img = liq.new_image_stride(image.buf(), image.width(), image.height(), image.stride(), 0.)?;
    let mut res = liq.quantize(&img)?;
    res.set_dithering_level(0.5);

    let (pal, pal_img) = res.remapped(&mut img)?;
    debug_assert_eq!(img.width() * img.height(), pal_img.len());

    Ok(reserve_transparent_index(Img::new(pal_img, image.width(), image.height()), pal))
}

/// Inserts a fully transparent entry at `TRANSPARENT_INDEX`, shifting the indices of the opaque colors past it
fn reserve_transparent_index(mut image8: ImgVec<u8>, mut pal: Vec<RGBA8>) -> (ImgVec<u8>, Vec<RGBA8>) {
    let reserved = usize::from(TRANSPARENT_INDEX);
    if pal.len() <= reserved {
        pal.resize(reserved, RGBA8::new(0, 0, 0, 255));
        pal.push(RGBA8::new(0, 0, 0, 0));
    } else {
        debug_assert!(pal.len() < 256);
        pal.insert(reserved, RGBA8::new(0, 0, 0, 0));
        for px in image8.buf_mut().iter_mut().filter(|px| **px >= TRANSPARENT_INDEX) {
            *px += 1;
        }
    }
    (image8, pal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_palette_is_padded_up_to_reserved_index() {
        let image = ImgVec::new(vec![0, 1, 1, 0], 2, 2);
        let pal = vec![RGBA8::new(1, 2, 3, 255), RGBA8::new(4, 5, 6, 255)];
        let (image, pal) = reserve_transparent_index(image, pal);
        assert_eq!(pal.len(), 101);
        assert_eq!(pal[100].a, 0);
        assert_eq!(pal[1], RGBA8::new(4, 5, 6, 255));
        assert_eq!(image.buf(), &[0, 1, 1, 0][..]);
    }

    #[test]
    fn full_palette_shifts_indices_past_reserved_one() {
        let pal: Vec<_> = (0..255u8).map(|i| RGBA8::new(i, i, i, 255)).collect();
        let image = ImgVec::new(vec![99, 100, 254, 3], 2, 2);
        let (image, pal) = reserve_transparent_index(image, pal);
        assert_eq!(pal.len(), 256);
        assert_eq!(pal[100].a, 0);
        assert_eq!(image.buf(), &[99, 101, 255, 3][..]);
        assert_eq!(pal[101], RGBA8::new(100, 100, 100, 255));
        assert_eq!(pal[255], RGBA8::new(254, 254, 254, 255));
    }

    #[test]
    fn global_palette_is_shared() {
        let frames: Vec<_> = [RGBA8::new(255, 0, 0, 255), RGBA8::new(0, 0, 255, 255)].iter().map(|&c| StampedFrame {
            image: ImgVec::new(vec![c; 16], 4, 4),
            duration_ms: 100,
        }).collect();
        let out = palettize(&frames, &Settings::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].pal, out[1].pal);
        assert_ne!(out[0].image.buf()[0], out[1].image.buf()[0]);
        assert_eq!(out[0].image.width(), 4);
        assert_eq!(out[0].image.height(), 4);
    }

    #[test]
    fn palette_mode_names() {
        assert_eq!("global".parse::<PaletteMode>(), Ok(PaletteMode::Global));
        assert_eq!("per-frame".parse::<PaletteMode>(), Ok(PaletteMode::PerFrame));
        assert!("adaptive".parse::<PaletteMode>().is_err());
    }
}
