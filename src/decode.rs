//! Reads the downloaded GIF back as a sequence of full RGBA screens

use crate::error::*;
use crate::DEFAULT_FRAME_DURATION_MS;
use gif::Decoder;
use imgref::ImgVec;
use rgb::RGBA8;
use std::io::Cursor;

/// One fully composed screen of the source animation
#[derive(Clone, Debug)]
pub struct SourceFrame {
    pub image: ImgVec<RGBA8>,
    pub duration_ms: u32,
}

/// Iterates frames in source order. Ends at the GIF trailer.
pub struct GifDecoder {
    decoder: Decoder<Cursor<Vec<u8>>>,
    screen: gif_dispose::Screen,
    frames_read: usize,
    done: bool,
}

impl GifDecoder {
    pub fn new(data: Vec<u8>) -> CatResult<Self> {
        let mut gif_opts = gif::DecodeOptions::new();
        // Important:
        gif_opts.set_color_output(gif::ColorOutput::Indexed);

        let decoder = gif_opts.read_info(Cursor::new(data)).map_err(|e| Error::Decode(e.to_string()))?;
        let screen = gif_dispose::Screen::new_decoder(&decoder);

        Ok(Self {
            decoder,
            screen,
            frames_read: 0,
            done: false,
        })
    }

    pub fn width(&self) -> usize {
        usize::from(self.decoder.width())
    }

    pub fn height(&self) -> usize {
        usize::from(self.decoder.height())
    }

    /// Source frames carry their own disposal and offsets, so each one is
    /// blitted onto the screen before being handed out.
    fn read_frame(&mut self) -> CatResult<Option<SourceFrame>> {
        let frame = match self.decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            // the decoder runs out of input instead of seeing an image block
            Err(err) if self.frames_read == 0 && is_eof(&err) => return Ok(None),
            Err(err) => return Err(Error::Decode(err.to_string())),
        };
        self.screen.blit_frame(frame).map_err(|e| Error::Decode(e.to_string()))?;
        self.frames_read += 1;
        Ok(Some(SourceFrame {
            image: self.screen.pixels.clone(),
            duration_ms: duration_ms(frame.delay),
        }))
    }
}

impl Iterator for GifDecoder {
    type Item = CatResult<SourceFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let res = self.read_frame().transpose();
        if !matches!(res, Some(Ok(_))) {
            self.done = true;
        }
        res
    }
}

fn is_eof(err: &gif::DecodingError) -> bool {
    match err {
        gif::DecodingError::Io(err) => err.kind() == std::io::ErrorKind::UnexpectedEof,
        gif::DecodingError::Format(_) => err.to_string().contains("unexpected EOF"),
    }
}

/// A delay of 0 means the source didn't set one
fn duration_ms(delay: u16) -> u32 {
    if delay == 0 {
        DEFAULT_FRAME_DURATION_MS
    } else {
        u32::from(delay) * 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn two_color_gif(delays: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut enc = gif::Encoder::new(&mut out, 3, 2, &[255, 0, 0, 0, 0, 255]).unwrap();
            for (n, &delay) in delays.iter().enumerate() {
                enc.write_frame(&gif::Frame {
                    width: 3,
                    height: 2,
                    delay,
                    buffer: Cow::Owned(vec![(n % 2) as u8; 6]),
                    ..gif::Frame::default()
                }).unwrap();
            }
        }
        out
    }

    #[test]
    fn yields_every_frame_with_durations() {
        let decoder = GifDecoder::new(two_color_gif(&[4, 0, 25])).unwrap();
        assert_eq!((decoder.width(), decoder.height()), (3, 2));

        let frames = decoder.collect::<CatResult<Vec<_>>>().unwrap();
        assert_eq!(frames.iter().map(|f| f.duration_ms).collect::<Vec<_>>(), vec![40, 100, 250]);
        assert_eq!(frames[0].image.buf()[0], RGBA8::new(255, 0, 0, 255));
        assert_eq!(frames[1].image.buf()[5], RGBA8::new(0, 0, 255, 255));
    }

    #[test]
    fn header_and_trailer_only_is_empty() {
        let data = two_color_gif(&[]);
        assert_eq!(data.last(), Some(&b';'));
        let frames = GifDecoder::new(data).unwrap().collect::<CatResult<Vec<_>>>().unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(GifDecoder::new(b"not a gif".to_vec()), Err(Error::Decode(_))));
    }
}
