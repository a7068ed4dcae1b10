use std::path::PathBuf;

use block_inspect_core::{CollectError, ConfigError, ReportError, source::SourceError};
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("Invalid report configuration: {source}"))]
    Config { source: ConfigError },

    #[snafu(display("Invalid --{flag} '{value}'. Expected a duration such as 40h, 10d or 1h30m"))]
    InvalidThreshold { flag: String, value: String },

    #[snafu(display("No config file given and $HOME is not set. Pass --config-file or --local."))]
    NoConfigFile,

    #[snafu(display("Failed to read config file {}: {source}", path.display()))]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse config file {}: {source}", path.display()))]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Region '{region}' not found in config file. Known regions: {known}"))]
    UnknownRegion { region: String, known: String },

    #[snafu(display("Failed to load block descriptors from {location}: {source}"))]
    Source {
        location: String,
        #[snafu(source(from(SourceError, Box::new)))]
        source: Box<SourceError>,
    },

    #[snafu(display(
        "{source}. \
         Re-run with --on-error tolerant to skip unreadable descriptors."
    ))]
    Collect { source: CollectError },

    #[snafu(display("Failed to build report: {source}"))]
    Report { source: ReportError },

    #[snafu(display("Failed to write output: {source}"))]
    WriteOutput { source: std::io::Error },
}
