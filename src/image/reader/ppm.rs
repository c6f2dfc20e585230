use std::io::{self, Read};

use super::super::RGBImage;
use super::ImageReader;
use crate::error::Error;
use crate::image::{number_of_pixels_for, Image};
use crate::pixel::RGBPixel;

pub struct PPMImageReader<T: Read> {
    reader: T,
}

impl<T: Read> PPMImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }
}

impl<T: Read> ImageReader for PPMImageReader<T> {
    fn read_image(&mut self) -> crate::Result<RGBImage> {
        let mut tokenizer = PPMTokenizer::new(&mut self.reader);
        let result = PPMParser::new(&mut tokenizer).parse_tokens();
        // a read failure ends the token stream early, report it instead of
        // whatever the parser concluded from the missing tokens
        if let Some(error) = tokenizer.take_error() {
            return Err(Error::FailedToReadInputFile(error));
        }
        result
    }
}

struct PPMTokenizer<'a, R: Read> {
    reader: &'a mut R,
    buffer: Vec<u8>,
    error: Option<io::Error>,
}

impl<'a, R: Read> PPMTokenizer<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        PPMTokenizer {
            reader,
            buffer: Vec::new(),
            error: None,
        }
    }

    /// Reads at most `length` bytes. Fewer bytes are returned when the
    /// stream ends early.
    fn read_raw(&mut self, length: u64) -> io::Result<Vec<u8>> {
        let mut raster = Vec::new();
        self.reader.by_ref().take(length).read_to_end(&mut raster)?;
        Ok(raster)
    }

    fn read_byte(&mut self, byte: &mut [u8; 1]) -> bool {
        loop {
            match self.reader.read(byte) {
                Ok(read) => return read > 0,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(e);
                    return false;
                }
            }
        }
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: Read> Iterator for PPMTokenizer<'_, R> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let mut byte = [0; 1];
        let mut in_comment = false;

        while self.read_byte(&mut byte) {
            if in_comment {
                if byte[0] == b'\n' {
                    in_comment = false;
                }
                continue;
            }
            if byte[0] == b'#' {
                in_comment = true;
                continue;
            }
            if byte[0].is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte[0]);
            }
        }

        if self.buffer.is_empty() {
            return None;
        }

        Some(String::from_utf8_lossy(&self.buffer).into_owned())
    }
}

const MAGIC_NUMBER_TOKEN_NAME: &str = "P3/P6 Header";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";
const COLOR_COMPONENT_VALUE_TOKEN_NAME: &str = "Color Component Value";

const LARGEST_MAX_VALUE: u32 = u16::MAX as u32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SampleEncoding {
    Plain,
    Raw,
}

impl SampleEncoding {
    fn from_magic_number(token: &str) -> Option<Self> {
        match token {
            "P3" => Some(Self::Plain),
            "P6" => Some(Self::Raw),
            _ => None,
        }
    }
}

struct Header {
    encoding: SampleEncoding,
    width: usize,
    height: usize,
    max_value: u16,
}

impl Header {
    fn number_of_pixels(&self) -> crate::Result<usize> {
        number_of_pixels_for(&[self.width, self.height])
    }
}

#[derive(Clone, Copy)]
struct Dot {
    buffer: [u16; 3],
    index: usize,
}

impl Dot {
    fn new() -> Self {
        Self {
            buffer: [u16::default(); 3],
            index: 0,
        }
    }

    fn push_color_component(&mut self, component: u16) {
        if self.is_complete() {
            return;
        }
        self.buffer[self.index] = component;
        self.index += 1;
    }

    fn is_complete(&self) -> bool {
        self.index == 3
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn is_empty(&self) -> bool {
        self.index == 0
    }

    fn to_pixel(self, max_value: u16) -> crate::Result<RGBPixel<u8>> {
        RGBPixel::from_range(max_value, self.buffer[0], self.buffer[1], self.buffer[2])
    }
}

/// Reads every image of a PPM stream. Each image becomes one z-slice.
struct PPMParser<'a, 'r, R: Read> {
    tokenizer: &'a mut PPMTokenizer<'r, R>,
}

impl<'a, 'r, R: Read> PPMParser<'a, 'r, R> {
    fn new(tokenizer: &'a mut PPMTokenizer<'r, R>) -> Self {
        Self { tokenizer }
    }

    fn parse_tokens(&mut self) -> crate::Result<RGBImage> {
        let first_header = self.parse_first_header()?;
        let slice_size = (first_header.width, first_header.height);
        let mut pixels = self.parse_slice(&first_header)?;
        let mut depth = 1;
        while let Some(header) = self.parse_following_header()? {
            Self::check_slice_size_matches(slice_size, &header)?;
            pixels.extend(self.parse_slice(&header)?);
            depth += 1;
        }
        log::debug!(
            "Parsed {} PPM slice(s) of size {}x{}",
            depth,
            slice_size.0,
            slice_size.1
        );
        Image::from_pixels([slice_size.0, slice_size.1, depth], pixels)
    }

    fn parse_first_header(&mut self) -> crate::Result<Header> {
        let magic_number = self.tokenizer.next().ok_or(
            Error::PPMFileDoesNotContainRequiredToken(MAGIC_NUMBER_TOKEN_NAME),
        )?;
        self.parse_header_after_magic_number(&magic_number)?
            .ok_or(Error::PPMFileDoesNotContainRequiredToken(
                MAGIC_NUMBER_TOKEN_NAME,
            ))
    }

    // Anything but a magic number after a complete slice means the previous
    // slice carried more values than its header announced.
    fn parse_following_header(&mut self) -> crate::Result<Option<Header>> {
        match self.tokenizer.next() {
            None => Ok(None),
            Some(token) => self
                .parse_header_after_magic_number(&token)?
                .map(Some)
                .ok_or(Error::MismatchOfSizeBetweenHeaderAndValues),
        }
    }

    fn parse_header_after_magic_number(&mut self, token: &str) -> crate::Result<Option<Header>> {
        let Some(encoding) = SampleEncoding::from_magic_number(token) else {
            return Ok(None);
        };
        let width = self.parse_dimension(WIDTH_HEADER_TOKEN_NAME)?;
        let height = self.parse_dimension(HEIGHT_HEADER_TOKEN_NAME)?;
        let max_value = self.parse_max_value()?;
        Ok(Some(Header {
            encoding,
            width,
            height,
            max_value,
        }))
    }

    fn check_slice_size_matches(expected: (usize, usize), header: &Header) -> crate::Result<()> {
        let actual = (header.width, header.height);
        if actual != expected {
            return Err(Error::MismatchOfSliceSizes { expected, actual });
        }
        Ok(())
    }

    fn next_header_token(&mut self, token_name: &'static str) -> crate::Result<String> {
        self.tokenizer
            .next()
            .ok_or(Error::PPMFileDoesNotContainRequiredToken(token_name))
    }

    fn parse_dimension(&mut self, token_name: &'static str) -> crate::Result<usize> {
        self.next_header_token(token_name)?
            .parse::<u32>()
            .map(|value| value as usize)
            .map_err(|_| Error::ParsingOfTokenFailed(token_name))
    }

    fn parse_max_value(&mut self) -> crate::Result<u16> {
        let max_value: u32 = self
            .next_header_token(MAX_VALUE_HEADER_TOKEN_NAME)?
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(MAX_VALUE_HEADER_TOKEN_NAME))?;
        if max_value == 0 || max_value > LARGEST_MAX_VALUE {
            return Err(Error::InvalidMaxValue(max_value));
        }
        Ok(max_value as u16)
    }

    fn parse_slice(&mut self, header: &Header) -> crate::Result<Vec<RGBPixel<u8>>> {
        let dots = match header.encoding {
            SampleEncoding::Plain => self.parse_plain_dots(header.number_of_pixels()?)?,
            SampleEncoding::Raw => self.parse_raw_dots(header)?,
        };
        dots.into_iter()
            .map(|dot| dot.to_pixel(header.max_value))
            .collect()
    }

    fn parse_plain_dots(&mut self, number_of_pixels: usize) -> crate::Result<Vec<Dot>> {
        let mut current_dot = Dot::new();
        let mut dots = Vec::new();
        while dots.len() < number_of_pixels {
            let Some(token) = self.tokenizer.next() else {
                break;
            };
            let component = Self::parse_color_value(&token)?;
            current_dot.push_color_component(component);
            if current_dot.is_complete() {
                dots.push(current_dot);
                current_dot.reset();
            }
        }
        Self::check_pixel_was_complete(&current_dot)?;
        if dots.len() != number_of_pixels {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        Ok(dots)
    }

    fn parse_raw_dots(&mut self, header: &Header) -> crate::Result<Vec<Dot>> {
        let bytes_per_sample = if header.max_value > u8::MAX as u16 { 2 } else { 1 };
        let bytes_per_pixel = 3 * bytes_per_sample;
        let expected_length = header
            .number_of_pixels()?
            .checked_mul(bytes_per_pixel)
            .ok_or_else(|| Error::ImageSizeOverflow(vec![header.width, header.height]))?;
        let raster = self
            .tokenizer
            .read_raw(expected_length as u64)
            .map_err(Error::FailedToReadInputFile)?;
        if raster.len() != expected_length {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        let dots = raster
            .chunks_exact(bytes_per_pixel)
            .map(|pixel_bytes| {
                let mut dot = Dot::new();
                for sample in pixel_bytes.chunks_exact(bytes_per_sample) {
                    let component = sample
                        .iter()
                        .fold(0_u16, |value, byte| (value << 8) | *byte as u16);
                    dot.push_color_component(component);
                }
                dot
            })
            .collect();
        Ok(dots)
    }

    fn check_pixel_was_complete(dot: &Dot) -> crate::Result<()> {
        if !dot.is_empty() {
            return Err(Error::IncompletePixelParsed(dot.index));
        }
        Ok(())
    }

    fn parse_color_value(token: &str) -> crate::Result<u16> {
        token
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(COLOR_COMPONENT_VALUE_TOKEN_NAME))
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Read};

    use super::{PPMImageReader, PPMParser, PPMTokenizer};
    use crate::error::{Error, ErrorKind};
    use crate::image::reader::ImageReader;
    use crate::image::RGBImage;
    use crate::pixel::RGBPixel;
    use crate::Result;

    fn parse_ppm_tokens(token_string: &str) -> Result<RGBImage> {
        let mut bytes = token_string.as_bytes();
        let mut tokenizer = PPMTokenizer::new(&mut bytes);
        let mut parser = PPMParser::new(&mut tokenizer);
        parser.parse_tokens()
    }

    fn parse_ppm_bytes(bytes: &[u8]) -> Result<RGBImage> {
        PPMImageReader::new(bytes).read_image()
    }

    #[test]
    fn read_string() {
        let string = "P3\n# Example PPM image string\n3 2\n255\n255 0 0   0 255 0   0 0 255\n255 255 0  255 0 255  0 255 255";
        let image = parse_ppm_tokens(string).unwrap();
        assert_eq!(image.size(), &[3, 2, 1]);
        assert_eq!(
            image.get_pixel(&[1, 1, 0]).unwrap(),
            RGBPixel::new(255, 0, 255)
        );
    }

    #[test]
    fn read_continuous_string() {
        let string = "P3 3 2 255 255 0 0   0 255 0   0 0 255 255 255 0  255 0 255  0 255 255";
        let image = parse_ppm_tokens(string).unwrap();
        assert_eq!(image.size(), &[3, 2, 1]);
    }

    #[test]
    fn read_newline_string() {
        let string = "P3\n# Example PPM image newlines\n3\n2\n255\n255\n0\n0\n0\n255\n0\n0\n0\n255\n255\n255\n0\n255\n0\n255\n0\n255\n255";
        let image = parse_ppm_tokens(string).unwrap();
        assert_eq!(image.size(), &[3, 2, 1]);
        assert_eq!(
            image.get_pixel(&[2, 0, 0]).unwrap(),
            RGBPixel::new(0, 0, 255)
        );
    }

    #[test]
    fn read_plain_with_small_max_value() {
        let image = parse_ppm_tokens("P3 1 1 15 2 5 15").unwrap();
        assert_eq!(
            image.get_pixel(&[0, 0, 0]).unwrap(),
            RGBPixel::new(34, 85, 255)
        );
    }

    #[test]
    fn read_raw_8bit() {
        let mut bytes = b"P6\n# raw\n2 1\n255\n".to_vec();
        bytes.extend([200, 100, 50, 1, 2, 3]);
        let image = parse_ppm_bytes(&bytes).unwrap();
        assert_eq!(image.size(), &[2, 1, 1]);
        assert_eq!(
            image.get_pixel(&[0, 0, 0]).unwrap(),
            RGBPixel::new(200, 100, 50)
        );
        assert_eq!(image.get_pixel(&[1, 0, 0]).unwrap(), RGBPixel::new(1, 2, 3));
    }

    #[test]
    fn read_raw_bytes_that_look_like_comments_and_whitespace() {
        let mut bytes = b"P6 1 1 255\n".to_vec();
        bytes.extend([b'#', b' ', b'\n']);
        let image = parse_ppm_bytes(&bytes).unwrap();
        assert_eq!(
            image.get_pixel(&[0, 0, 0]).unwrap(),
            RGBPixel::new(b'#', b' ', b'\n')
        );
    }

    #[test]
    fn read_raw_16bit() {
        let mut bytes = b"P6 1 1 65535\n".to_vec();
        bytes.extend([0xFF, 0xFF, 0x00, 0x00, 0x80, 0x80]);
        let image = parse_ppm_bytes(&bytes).unwrap();
        assert_eq!(
            image.get_pixel(&[0, 0, 0]).unwrap(),
            RGBPixel::new(255, 0, 128)
        );
    }

    #[test]
    fn read_raw_truncated() {
        let mut bytes = b"P6 2 1 255\n".to_vec();
        bytes.extend([1, 2, 3, 4]);
        assert!(matches!(
            parse_ppm_bytes(&bytes),
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn read_multiple_images_as_slices() {
        let mut bytes = b"P3 2 1 255 1 1 1 2 2 2\n".to_vec();
        bytes.extend(b"P6 2 1 255\n");
        bytes.extend([3, 3, 3, 4, 4, 4]);
        bytes.extend(b"\nP3 2 1 255 5 5 5 6 6 6");
        let image = parse_ppm_bytes(&bytes).unwrap();
        assert_eq!(image.size(), &[2, 1, 3]);
        assert_eq!(image.get_pixel(&[1, 0, 0]).unwrap(), RGBPixel::new(2, 2, 2));
        assert_eq!(image.get_pixel(&[0, 0, 1]).unwrap(), RGBPixel::new(3, 3, 3));
        assert_eq!(image.get_pixel(&[1, 0, 2]).unwrap(), RGBPixel::new(6, 6, 6));
    }

    #[test]
    fn slices_of_different_size() {
        let string = "P3 2 1 255 1 1 1 2 2 2 P3 1 2 255 3 3 3 4 4 4";
        match parse_ppm_tokens(string) {
            Err(Error::MismatchOfSliceSizes { expected, actual }) => {
                assert_eq!(expected, (2, 1));
                assert_eq!(actual, (1, 2));
            }
            other => panic!("Slice size mismatch not detected, got {:?}", other),
        }
    }

    #[test]
    fn incomplete_pixel() {
        let string = "P3\n3 2 255 0 0 255 0 0";
        if let Err(Error::IncompletePixelParsed(n)) = parse_ppm_tokens(string) {
            if n != 2 {
                panic!("Number of parsed pixels should be 2, but was {}", n);
            }
            return;
        };
        panic!("Incomplete pixel not detected");
    }

    #[test]
    fn wrong_size() {
        let string = "P3\n3 2 255 0 0 255";
        if let Err(Error::MismatchOfSizeBetweenHeaderAndValues) = parse_ppm_tokens(string) {
            return;
        };
        panic!("Mismatch of size in header and actual pixels was not detected!");
    }

    #[test]
    fn too_many_values() {
        let string = "P3 1 1 255 1 2 3 4 5 6";
        assert!(matches!(
            parse_ppm_tokens(string),
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn missing_magic_number() {
        for string in ["", "P5 1 1 255 0", "# only a comment\n"] {
            assert!(
                matches!(
                    parse_ppm_tokens(string),
                    Err(Error::PPMFileDoesNotContainRequiredToken(_))
                ),
                "Missing magic number not detected in {:?}",
                string
            );
        }
    }

    #[test]
    fn missing_max_value() {
        assert!(matches!(
            parse_ppm_tokens("P3 1 1"),
            Err(Error::PPMFileDoesNotContainRequiredToken(
                super::MAX_VALUE_HEADER_TOKEN_NAME
            ))
        ));
    }

    #[test]
    fn unparsable_width() {
        assert!(matches!(
            parse_ppm_tokens("P3 wide 1 255 0 0 0"),
            Err(Error::ParsingOfTokenFailed(super::WIDTH_HEADER_TOKEN_NAME))
        ));
    }

    #[test]
    fn invalid_max_value() {
        assert!(matches!(
            parse_ppm_tokens("P3 1 1 0 0 0 0"),
            Err(Error::InvalidMaxValue(0))
        ));
        assert!(matches!(
            parse_ppm_tokens("P3 1 1 65536 0 0 0"),
            Err(Error::InvalidMaxValue(65536))
        ));
    }

    #[test]
    fn component_greater_than_max_value() {
        assert!(matches!(
            parse_ppm_tokens("P3 1 1 100 0 101 0"),
            Err(Error::ComponentExceedsMaxValue(101, 100))
        ));
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn plain_header_with_huge_size() {
        let string = "P3 4294967295 4294967295 255 0 0 0";
        let error = parse_ppm_tokens(string).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Load, "unexpected error {:?}", error);
    }

    #[test]
    fn raw_header_with_huge_size() {
        let bytes = b"P6 4294967295 4294967295 255\n\x01\x02\x03";
        assert!(matches!(
            parse_ppm_bytes(bytes),
            Err(Error::ImageSizeOverflow(_))
        ));
    }

    #[test]
    fn raw_header_larger_than_content() {
        let bytes = b"P6 60000 60000 255\n\x01\x02\x03";
        assert!(matches!(
            parse_ppm_bytes(bytes),
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn read_failure_in_header() {
        let mut reader = PPMImageReader::new("P3 2 1".as_bytes().chain(BrokenReader));
        match reader.read_image() {
            Err(error @ Error::FailedToReadInputFile(_)) => {
                assert_eq!(error.kind(), ErrorKind::Load)
            }
            other => panic!("Read failure not reported, got {:?}", other),
        }
    }

    #[test]
    fn read_failure_in_raw_samples() {
        let bytes = b"P6 2 1 255\n\x01\x02".as_slice();
        let mut reader = PPMImageReader::new(bytes.chain(BrokenReader));
        assert!(matches!(
            reader.read_image(),
            Err(Error::FailedToReadInputFile(_))
        ));
    }
}
