use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_PIXEL_INDEX: [i64; 3] = [25, 35, 0];

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        Self::register_pixel_index_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_pixel_index_argument(command: Command) -> Command {
        command.arg(Self::create_pixel_index_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to RGB image file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_pixel_index_argument() -> Arg {
        let default_index = DEFAULT_PIXEL_INDEX.map(|i| i.to_string()).join(",");
        arg!(pixel_index: -i --index <X_Y_Z> "Comma separated index of the pixel to print")
            .default_value(default_index)
            .allow_hyphen_values(true)
            .value_parser(parse_pixel_index)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            pixel_index: Self::extract_pixel_index_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_pixel_index_argument(matches: &ArgMatches) -> [i64; 3] {
        matches
            .get_one::<[i64; 3]>("pixel_index")
            .expect("Pixel index must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_pixel_index(value: &str) -> Result<[i64; 3], String> {
    let components = value
        .split(',')
        .map(|component| component.trim().parse::<i64>())
        .collect::<Result<Vec<i64>, _>>()
        .map_err(|e| format!("index component is no integer: {}", e))?;
    <[i64; 3]>::try_from(components).map_err(|components| {
        format!(
            "index must have exactly 3 components, but got {}",
            components.len()
        )
    })
}
