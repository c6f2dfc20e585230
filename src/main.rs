use std::env::args_os;
use std::io::stdout;
use std::process::ExitCode;

use rgb_image_probe::{print_pixel_components, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match print_pixel_components(&arguments, &mut stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("Reading pixel failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
