use crate::error::CatResult;
use crate::Encoder;
use crate::GIFFrame;
use crate::TRANSPARENT_INDEX;
use rgb::*;
use std::borrow::Cow;
use std::io::Write;

pub(crate) struct RustEncoder<W: Write> {
    gif_enc: gif::Encoder<W>,
}

impl<W: Write> RustEncoder<W> {
    /// Writes the header and the infinite-loop extension
    pub fn new(writer: W, screen_width: u16, screen_height: u16) -> CatResult<Self> {
        let mut gif_enc = gif::Encoder::new(writer, screen_width, screen_height, &[])?;
        gif_enc.write_extension(gif::ExtensionData::Repetitions(gif::Repeat::Infinite))?;
        Ok(Self { gif_enc })
    }
}

impl<W: Write> Encoder for RustEncoder<W> {
    fn write_frame(&mut self, f: &GIFFrame, delay: u16) -> CatResult<()> {
        let GIFFrame {ref pal, ref image, ..} = *f;

        let mut pal_rgb = Vec::with_capacity(3 * pal.len());
        for p in pal {
            pal_rgb.extend_from_slice([p.rgb()].as_bytes());
        }

        self.gif_enc.write_frame(&gif::Frame {
            delay,
            // cleared before the next frame is drawn
            dispose: gif::DisposalMethod::Background,
            transparent: Some(TRANSPARENT_INDEX),
            needs_user_input: false,
            top: 0,
            left: 0,
            width: image.width() as u16,
            height: image.height() as u16,
            interlaced: false,
            palette: Some(pal_rgb),
            buffer: Cow::Borrowed(image.buf()),
        })?;
        Ok(())
    }
}
