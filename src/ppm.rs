//! Binary PPM (`P6`) output.
//!
//! The layout is fixed: magic, one comment line, `"{width} {height}"`, the
//! maximum channel value, each on its own line, then `width * height` RGB
//! triplets in row-major order from the top-left pixel. Nothing follows the
//! pixel data.
use std::io::{self, Write};

use image::{Rgb, RgbImage};

use crate::error::RenderError;

pub const MAGIC: &str = "P6";
pub const MAX_VALUE: u8 = 255;
pub const DEFAULT_COMMENT: &str = "fractox escape-time render";

/// Streams one image. The header goes out in [`PpmWriter::new`]; pixels
/// follow one at a time or as a whole buffer; [`PpmWriter::finish`] checks
/// the count and flushes.
pub struct PpmWriter<W: Write> {
    inner: W,
    width: usize,
    height: usize,
    written: usize,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(mut inner: W, width: usize, height: usize, comment: &str) -> io::Result<Self> {
        let comment: String = comment
            .chars()
            .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
            .collect();
        write!(
            inner,
            "{}\n#{}\n{} {}\n{}\n",
            MAGIC, comment, width, height, MAX_VALUE
        )?;
        Ok(Self {
            inner,
            width,
            height,
            written: 0,
        })
    }

    pub fn expected(&self) -> usize {
        self.width * self.height
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_pixel(&mut self, pixel: Rgb<u8>) -> io::Result<()> {
        self.inner.write_all(&pixel.0)?;
        self.written += 1;
        Ok(())
    }

    /// Write a whole buffer. Its dimensions must match the header.
    pub fn write_image(&mut self, img: &RgbImage) -> Result<(), RenderError> {
        let (w, h) = img.dimensions();
        if w as usize != self.width || h as usize != self.height {
            return Err(RenderError::PixelCount {
                expected: self.expected(),
                written: self.written + (w as usize * h as usize),
            });
        }
        self.inner.write_all(img.as_raw())?;
        self.written += self.expected();
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, RenderError> {
        if self.written != self.expected() {
            return Err(RenderError::PixelCount {
                expected: self.expected(),
                written: self.written,
            });
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_header_layout() {
        let w = PpmWriter::new(Vec::new(), 4, 2, "hello").unwrap();
        assert_eq!(w.inner, b"P6\n#hello\n4 2\n255\n");
    }

    #[test]
    fn test_comment_stays_on_one_line() {
        let w = PpmWriter::new(Vec::new(), 1, 1, "two\nlines").unwrap();
        assert_eq!(w.inner, b"P6\n#two lines\n1 1\n255\n");
    }

    #[test]
    fn test_pixels_follow_header() {
        let mut w = PpmWriter::new(Vec::new(), 2, 1, "").unwrap();
        w.write_pixel(Rgb([1, 2, 3])).unwrap();
        w.write_pixel(Rgb([250, 251, 252])).unwrap();
        let out = w.finish().unwrap();
        assert_eq!(out, b"P6\n#\n2 1\n255\n\x01\x02\x03\xfa\xfb\xfc");
    }

    #[test]
    fn test_write_image_row_major() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([9, 9, 9]));
        img.put_pixel(0, 1, Rgb([7, 7, 7]));
        let mut w = PpmWriter::new(Vec::new(), 2, 2, "x").unwrap();
        w.write_image(&img).unwrap();
        let out = w.finish().unwrap();
        let header = b"P6\n#x\n2 2\n255\n".len();
        assert_eq!(&out[header..], &[0, 0, 0, 9, 9, 9, 7, 7, 7, 0, 0, 0]);
    }

    #[test]
    fn test_short_write_is_an_error() {
        let mut w = PpmWriter::new(Vec::new(), 2, 2, "").unwrap();
        w.write_pixel(Rgb([0, 0, 0])).unwrap();
        match w.finish() {
            Err(RenderError::PixelCount { expected, written }) => {
                assert_eq!((expected, written), (4, 1));
            }
            other => panic!("unexpected {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_mismatched_image_is_an_error() {
        let mut w = PpmWriter::new(Vec::new(), 3, 3, "").unwrap();
        assert!(matches!(
            w.write_image(&RgbImage::new(2, 2)),
            Err(RenderError::PixelCount { expected: 9, .. })
        ));
    }
}
