use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::RGBImage;
use crate::error::Error;
use crate::logger::log_image_loaded;

pub mod codec;
pub mod ppm;

pub use codec::CodecImageReader;
pub use ppm::PPMImageReader;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<RGBImage>;
}

const PPM_MAGIC_NUMBERS: [&[u8; 2]; 2] = [b"P3", b"P6"];

fn open_input_file(file_path: &Path) -> crate::Result<File> {
    let path = file_path.display().to_string();
    File::open(file_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::InputFileNotFound(path),
        io::ErrorKind::PermissionDenied => Error::NoReadPermissionForInputFile(path),
        _ => Error::UnableToOpenInputFileForReading(path, e),
    })
}

fn starts_with_ppm_magic_number<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let head = reader.fill_buf()?;
    Ok(PPM_MAGIC_NUMBERS
        .iter()
        .any(|magic| head.starts_with(magic.as_slice())))
}

/// Loads the file at `file_path` as a three dimensional RGB image.
///
/// PPM files are read directly, any other format is handed to the `image`
/// crate.
pub fn read_image_file(file_path: &Path) -> crate::Result<RGBImage> {
    let input_file = open_input_file(file_path)?;
    let mut input_reader = BufReader::new(input_file);
    let is_ppm = starts_with_ppm_magic_number(&mut input_reader).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })?;
    let image = if is_ppm {
        log::debug!("Reading '{}' as PPM", file_path.display());
        PPMImageReader::new(input_reader).read_image()?
    } else {
        log::debug!("Reading '{}' through image codecs", file_path.display());
        CodecImageReader::new(input_reader).read_image()?
    };
    log_image_loaded(&file_path.display().to_string(), image.size());
    Ok(image)
}
