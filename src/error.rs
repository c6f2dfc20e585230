use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    OutOfBounds,
    InvalidIndex,
    Output,
}

#[derive(Debug)]
pub enum Error {
    PPMFileDoesNotContainRequiredToken(&'static str),
    ParsingOfTokenFailed(&'static str),
    IncompletePixelParsed(usize),
    MismatchOfSizeBetweenHeaderAndValues,
    MismatchOfSliceSizes {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    InvalidMaxValue(u32),
    ComponentExceedsMaxValue(u16, u16),
    InputFileNotFound(String),
    NoReadPermissionForInputFile(String),
    UnableToOpenInputFileForReading(String, std::io::Error),
    FailedToReadInputFile(std::io::Error),
    ImageSizeOverflow(Vec<usize>),
    UnsupportedImageFormat(String),
    ImageDecodingFailed(String),
    IndexOutOfBounds(Vec<i64>, Vec<usize>),
    InvalidChannelIndex(isize),
    FailedToWriteReport(std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfBounds(..) => ErrorKind::OutOfBounds,
            Self::InvalidChannelIndex(_) => ErrorKind::InvalidIndex,
            Self::FailedToWriteReport(_) => ErrorKind::Output,
            _ => ErrorKind::Load,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PPMFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in PPM file", token_name)
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::IncompletePixelParsed(number_of_tokens_parsed) => {
                write!(
                    f,
                    "Incomplete pixel parsed. Expected 3 components, but got {}.",
                    number_of_tokens_parsed
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of pixels does not match the size provided in header"
                )
            }
            Self::MismatchOfSliceSizes { expected, actual } => {
                write!(
                    f,
                    "Slice of size {}x{} does not match size {}x{} of the first slice",
                    actual.0, actual.1, expected.0, expected.1
                )
            }
            Self::InvalidMaxValue(max_value) => {
                write!(
                    f,
                    "Max value {} is invalid, it must be in range 1..=65535",
                    max_value
                )
            }
            Self::ComponentExceedsMaxValue(component, max_value) => {
                write!(
                    f,
                    "Color value {} must not be greater than max value of {}",
                    component, max_value
                )
            }
            Self::InputFileNotFound(path) => {
                write!(f, "Input file '{}' not found", path)
            }
            Self::NoReadPermissionForInputFile(path) => {
                write!(
                    f,
                    "Unable open file '{}' for reading. Permission denied.",
                    path
                )
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::FailedToReadInputFile(error) => {
                write!(f, "Failed to read input file: {}", error)
            }
            Self::ImageSizeOverflow(size) => {
                write!(f, "Image of size {:?} has too many pixels to address", size)
            }
            Self::UnsupportedImageFormat(reason) => {
                write!(f, "Unsupported image format: {}", reason)
            }
            Self::ImageDecodingFailed(reason) => {
                write!(f, "Decoding of image failed: {}", reason)
            }
            Self::IndexOutOfBounds(index, size) => {
                write!(
                    f,
                    "Index {:?} is outside of image with size {:?}",
                    index, size
                )
            }
            Self::InvalidChannelIndex(index) => {
                write!(
                    f,
                    "Channel index {} is invalid, an RGB pixel only has indices 0, 1 and 2",
                    index
                )
            }
            Self::FailedToWriteReport(error) => {
                write!(f, "Failed to write pixel report: {}", error)
            }
        }
    }
}

impl std::error::Error for Error {}
