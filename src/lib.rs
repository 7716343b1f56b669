pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::ProcessingConfig;
pub use error::{ProcessingError, Result};

use models::StationMap;
use processors::ParallelProcessor;
use std::path::Path;
use validator::Validate;
use writers::ReportWriter;

/// Summarise `input` into `output` with the given settings and return the
/// report line that was written.
pub fn summarise(input: &Path, output: &Path, config: &ProcessingConfig) -> Result<String> {
    config.validate()?;
    let stations: StationMap = ParallelProcessor::from_config(config).process_file(input, None)?;
    ReportWriter::new().write_report(&stations, output)
}
