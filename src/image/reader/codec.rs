use std::io::{BufRead, Seek};

use super::super::RGBImage;
use super::ImageReader;
use crate::error::Error;
use crate::image::Image;
use crate::pixel::RGBPixel;

/// Reads any format the `image` crate can guess from the file content.
/// The decoded picture is converted to 8-bit RGB and becomes a single slice.
pub struct CodecImageReader<T: BufRead + Seek> {
    reader: Option<T>,
}

impl<T: BufRead + Seek> CodecImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<T: BufRead + Seek> ImageReader for CodecImageReader<T> {
    fn read_image(&mut self) -> crate::Result<RGBImage> {
        let reader = self
            .reader
            .take()
            .ok_or_else(|| Error::ImageDecodingFailed("image was already read".to_owned()))?;
        let format_reader = ::image::ImageReader::new(reader)
            .with_guessed_format()
            .map_err(|e| Error::UnsupportedImageFormat(e.to_string()))?;
        let format = format_reader.format().ok_or_else(|| {
            Error::UnsupportedImageFormat("unable to guess format from content".to_owned())
        })?;
        log::debug!("Decoding image as {:?}", format);
        let decoded = format_reader
            .decode()
            .map_err(|e| Error::ImageDecodingFailed(e.to_string()))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|pixel| RGBPixel::from(pixel.0))
            .collect();
        Image::from_pixels([width as usize, height as usize, 1], pixels)
    }
}
