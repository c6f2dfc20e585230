use std::fmt::Display;
use std::io::{self, Write};

use crate::image::{Image, ImageIndex};
use crate::pixel::RGBPixel;

/// Channel values of one pixel, read once through the named getters and
/// once through positional access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelReadout<T> {
    pub named: (T, T, T),
    pub indexed: (T, T, T),
}

impl<T: PartialEq> ChannelReadout<T> {
    pub fn is_consistent(&self) -> bool {
        self.named == self.indexed
    }
}

pub fn fetch_pixel<T: Copy, const D: usize>(
    image: &Image<RGBPixel<T>, D>,
    index: &ImageIndex<D>,
) -> crate::Result<RGBPixel<T>> {
    let pixel = image.get_pixel(index)?;
    log::debug!("Fetched pixel at {:?}", index);
    Ok(pixel)
}

pub fn read_channels<T: Copy>(pixel: &RGBPixel<T>) -> crate::Result<ChannelReadout<T>> {
    let named = (pixel.red(), pixel.green(), pixel.blue());
    let indexed = (pixel.component(0)?, pixel.component(1)?, pixel.component(2)?);
    Ok(ChannelReadout { named, indexed })
}

pub fn write_report<T: Display, W: Write>(
    readout: &ChannelReadout<T>,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "Pixel values from GetRed,GetGreen,GetBlue:")?;
    write_channel_lines(&readout.named, writer)?;
    writeln!(writer, "Pixel values:")?;
    write_channel_lines(&readout.indexed, writer)
}

fn write_channel_lines<T: Display, W: Write>(
    (red, green, blue): &(T, T, T),
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "Red = {}", red)?;
    writeln!(writer, "Green = {}", green)?;
    writeln!(writer, "Blue = {}", blue)
}

#[cfg(test)]
mod test {
    use super::{fetch_pixel, read_channels, write_report, ChannelReadout};
    use crate::error::ErrorKind;
    use crate::image::RGBImage;
    use crate::pixel::RGBPixel;

    const EXPECTED_REPORT: &str = "Pixel values from GetRed,GetGreen,GetBlue:
Red = 200
Green = 100
Blue = 50
Pixel values:
Red = 200
Green = 100
Blue = 50
";

    fn create_test_image() -> RGBImage {
        let mut image = RGBImage::new([26, 36, 2], RGBPixel::new(1, 2, 3)).unwrap();
        image
            .set_pixel(&[25, 35, 0], RGBPixel::new(200, 100, 50))
            .unwrap();
        image
    }

    #[test]
    fn fetch_pixel_returns_stored_pixel() {
        let image = create_test_image();
        assert_eq!(
            fetch_pixel(&image, &[25, 35, 0]).unwrap(),
            RGBPixel::new(200, 100, 50)
        );
        assert_eq!(
            fetch_pixel(&image, &[25, 35, 1]).unwrap(),
            RGBPixel::new(1, 2, 3)
        );
    }

    #[test]
    fn fetch_pixel_out_of_bounds() {
        let image = create_test_image();
        let error = fetch_pixel(&image, &[26, 35, 0]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn read_channels_agree() {
        let readout = read_channels(&RGBPixel::<u8>::new(200, 100, 50)).unwrap();
        assert_eq!(readout.named, (200, 100, 50));
        assert_eq!(readout.indexed, (200, 100, 50));
        assert!(readout.is_consistent());
    }

    #[test]
    fn report_prints_numbers() {
        let readout = read_channels(&RGBPixel::<u8>::new(200, 100, 50)).unwrap();
        let mut output = Vec::new();
        write_report(&readout, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), EXPECTED_REPORT);
    }

    #[test]
    fn report_prints_small_values_as_numbers() {
        let readout = ChannelReadout {
            named: (65_u8, 0, 10),
            indexed: (65_u8, 0, 10),
        };
        let mut output = Vec::new();
        write_report(&readout, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Red = 65\n"));
        assert!(output.contains("Green = 0\n"));
        assert!(output.contains("Blue = 10\n"));
    }
}
