use crate::cli::args::{Cli, Commands};
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::ParallelProcessor;
use crate::readers::ChunkPlanner;
use crate::utils::constants::default_workers;
use crate::utils::progress::ProgressReporter;
use crate::writers::ReportWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, Level};
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            workers,
            buffer_size,
            timeout_secs,
            mmap,
            strict,
            print,
        } => {
            let started = Instant::now();

            let mut settings = match config {
                Some(path) => ProcessingConfig::from_file(&path)?,
                None => ProcessingConfig::default(),
            };
            if let Some(workers) = workers {
                settings = settings.with_workers(workers);
            }
            if let Some(buffer_size) = buffer_size {
                settings = settings.with_buffer_size(buffer_size);
            }
            if let Some(timeout_secs) = timeout_secs {
                settings = settings.with_timeout_secs(timeout_secs);
            }
            if mmap {
                settings = settings.with_mmap(true);
            }
            if strict {
                settings = settings.with_strict(true);
            }
            settings.validate()?;

            info!(
                input = %input.display(),
                output = %output.display(),
                workers = settings.workers,
                buffer_size = settings.buffer_size,
                mmap = settings.use_mmap,
                strict = settings.strict,
                "processing measurements"
            );

            let progress = if cli.quiet {
                ProgressReporter::silent()
            } else {
                ProgressReporter::new(settings.workers as u64, "Scanning chunks...", false)
            };

            let processor = ParallelProcessor::from_config(&settings);
            let stations = processor.process_file(&input, Some(&progress))?;

            progress.set_message("Writing report...");
            let report = ReportWriter::new().write_report(&stations, &output)?;
            progress.finish_with_message(&format!("Summarised {} stations", stations.len()));

            if print {
                println!("{}", report);
            }

            let elapsed = started.elapsed();
            info!(elapsed_ms = elapsed.as_millis() as u64, "processing complete");
            println!("{}", elapsed_message(elapsed));
        }

        Commands::Plan { input, workers } => {
            let workers = workers.unwrap_or_else(default_workers);
            let chunks = ChunkPlanner::new(workers).plan_file(&input)?;

            println!("Input: {}", input.display());
            println!("Workers: {}", workers);
            for (i, chunk) in chunks.iter().enumerate() {
                println!("  chunk {:>3}: {}", i, chunk);
            }
        }
    }

    Ok(())
}

/// Timing line printed after every run, regardless of `--quiet`.
fn elapsed_message(elapsed: Duration) -> String {
    format!("Processing took {:.2} ms", elapsed.as_secs_f64() * 1000.0)
}

/// Install the fmt subscriber: INFO by default, DEBUG with `--verbose`,
/// written to `log_file` instead of stderr when given.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_message_in_millis() {
        assert_eq!(
            elapsed_message(Duration::from_micros(1_234_567)),
            "Processing took 1234.57 ms"
        );
        assert_eq!(elapsed_message(Duration::ZERO), "Processing took 0.00 ms");
    }
}
