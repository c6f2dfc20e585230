use std::io::Write;
use std::path::PathBuf;

use crate::image::reader::read_image_file;
pub use cli::CLIParser;
use error::Error;
use pixel_accessor::{fetch_pixel, read_channels, write_report};

mod cli;
pub mod error;
pub mod image;
mod logger;
pub mod pixel;
pub mod pixel_accessor;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    pixel_index: [i64; 3],
}

impl Arguments {
    pub fn new(input_file: PathBuf, pixel_index: [i64; 3]) -> Self {
        Self {
            input_file,
            pixel_index,
        }
    }
}

/// Loads the input image and writes the components of the selected pixel
/// to `output`, once read by name and once by position.
///
/// The report is only written after loading and fetching succeeded, so a
/// failure never leaves partial output behind.
pub fn print_pixel_components<W: Write>(arguments: &Arguments, output: &mut W) -> Result<()> {
    let image = read_image_file(&arguments.input_file)?;
    let pixel = fetch_pixel(&image, &arguments.pixel_index)?;
    let readout = read_channels(&pixel)?;
    let mut report = Vec::new();
    write_report(&readout, &mut report).map_err(Error::FailedToWriteReport)?;
    output
        .write_all(&report)
        .and_then(|_| output.flush())
        .map_err(Error::FailedToWriteReport)
}
