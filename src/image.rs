use crate::error::Error;
use crate::pixel::RGBPixel;

pub mod reader;

/// Integer coordinate of a single grid cell, dimension 0 first.
pub type ImageIndex<const D: usize> = [i64; D];

/// Number of pixels along each dimension.
pub type ImageSize<const D: usize> = [usize; D];

pub type RGBImage = Image<RGBPixel<u8>, 3>;

/// Dense `D`-dimensional pixel grid.
///
/// Pixels are stored in a flat buffer where dimension 0 varies fastest,
/// followed by dimension 1 and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<P, const D: usize> {
    size: ImageSize<D>,
    pixels: Vec<P>,
}

/// Product of all extents, or `ImageSizeOverflow` when it does not fit `usize`.
pub fn number_of_pixels_for<const D: usize>(size: &ImageSize<D>) -> crate::Result<usize> {
    size.iter()
        .try_fold(1_usize, |product, &extent| product.checked_mul(extent))
        .ok_or_else(|| Error::ImageSizeOverflow(size.to_vec()))
}

impl<P: Clone, const D: usize> Image<P, D> {
    pub fn new(size: ImageSize<D>, fill: P) -> crate::Result<Self> {
        let number_of_pixels = number_of_pixels_for(&size)?;
        Ok(Self {
            size,
            pixels: vec![fill; number_of_pixels],
        })
    }
}

impl<P, const D: usize> Image<P, D> {
    pub fn from_pixels(size: ImageSize<D>, pixels: Vec<P>) -> crate::Result<Self> {
        let expected_number_of_pixels = number_of_pixels_for(&size)?;
        if pixels.len() != expected_number_of_pixels {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> &ImageSize<D> {
        &self.size
    }

    pub fn number_of_pixels(&self) -> usize {
        self.pixels.len()
    }

    pub fn contains(&self, index: &ImageIndex<D>) -> bool {
        index
            .iter()
            .zip(self.size.iter())
            .all(|(&position, &extent)| position >= 0 && (position as u64) < extent as u64)
    }

    pub fn offset(&self, index: &ImageIndex<D>) -> crate::Result<usize> {
        if !self.contains(index) {
            return Err(Error::IndexOutOfBounds(index.to_vec(), self.size.to_vec()));
        }
        let mut offset = 0;
        let mut stride = 1;
        for (&position, &extent) in index.iter().zip(self.size.iter()) {
            offset += position as usize * stride;
            stride *= extent;
        }
        Ok(offset)
    }

    pub fn set_pixel(&mut self, index: &ImageIndex<D>, pixel: P) -> crate::Result<()> {
        let offset = self.offset(index)?;
        self.pixels[offset] = pixel;
        Ok(())
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }
}

impl<P: Copy, const D: usize> Image<P, D> {
    pub fn get_pixel(&self, index: &ImageIndex<D>) -> crate::Result<P> {
        let offset = self.offset(index)?;
        Ok(self.pixels[offset])
    }
}
