use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_APPENDER_NAME: &str = "stderr";

#[ctor::ctor]
fn init() {
    if let Err(file_error) = log4rs::init_file(CONFIG_FILE, Default::default()) {
        init_fallback();
        log::debug!("Using built-in logging config, '{}' unusable: {}", CONFIG_FILE, file_error);
    }
}

// stdout carries the pixel report, so the fallback only ever writes to stderr
fn init_fallback() {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build(FALLBACK_APPENDER_NAME, Box::new(stderr)))
        .build(
            Root::builder()
                .appender(FALLBACK_APPENDER_NAME)
                .build(LevelFilter::Warn),
        );
    match config {
        Ok(config) => {
            if let Err(error) = log4rs::init_config(config) {
                eprintln!("Unable to initialize logging: {}", error);
            }
        }
        Err(error) => eprintln!("Invalid built-in logging config: {}", error),
    }
}

pub fn log_image_loaded(path: &str, size: &[usize]) {
    let number_of_pixels: usize = size.iter().product();
    log::info!(
        "Loaded '{}' with size {:?} ({} pixels)",
        path,
        size,
        number_of_pixels
    );
}
