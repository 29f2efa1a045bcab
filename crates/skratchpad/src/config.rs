//! Command-line configuration.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: skratchpad [OPTIONS] [FILE]

Arguments:
  [FILE]            Python file to open at startup

Options:
  --theme <NAME>    Color theme: dark (default) or light
  --no-highlight    Start with syntax highlighting switched off
  --log <PATH>      Write diagnostic logs to PATH (filter with RUST_LOG)
  -h, --help        Print help
  -V, --version     Print version";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl FromStr for ThemeName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(ConfigError::UnknownTheme(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub theme: ThemeName,
    pub highlighting: bool,
    pub log_file: Option<PathBuf>,
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::Dark,
            highlighting: true,
            log_file: None,
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(Config),
    Help,
    Version,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("option `{0}` requires a value")]
    MissingValue(&'static str),
    #[error("unknown theme `{0}` (expected `dark` or `light`)")]
    UnknownTheme(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

/// Parse arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<CliAction, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = Config::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "--no-highlight" => config.highlighting = false,
            "--theme" => {
                let value = args.next().ok_or(ConfigError::MissingValue("--theme"))?;
                config.theme = value.parse()?;
            }
            "--log" => {
                let value = args.next().ok_or(ConfigError::MissingValue("--log"))?;
                config.log_file = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--theme=") => {
                config.theme = arg["--theme=".len()..].parse()?;
            }
            _ if arg.starts_with("--log=") => {
                config.log_file = Some(PathBuf::from(&arg["--log=".len()..]));
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(ConfigError::UnknownOption(arg));
            }
            _ if config.file.is_some() => return Err(ConfigError::UnexpectedArgument(arg)),
            _ => config.file = Some(PathBuf::from(arg)),
        }
    }

    Ok(CliAction::Run(config))
}
