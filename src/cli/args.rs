use crate::utils::constants::{DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brc-processor")]
#[command(about = "Per-station min/avg/max summary of large measurement files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide the progress bar")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarise a measurements file into a single report line
    Process {
        #[arg(short, long, default_value = DEFAULT_INPUT_FILE, help = "Input measurements file")]
        input: PathBuf,

        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE, help = "Output report file")]
        output: PathBuf,

        #[arg(short, long, help = "Configuration file (toml, json, yaml)")]
        config: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Worker threads [default: half the available cores, at least 2]"
        )]
        workers: Option<usize>,

        #[arg(long, help = "Transfer buffer size per worker in bytes [default: 1048576]")]
        buffer_size: Option<usize>,

        #[arg(
            long,
            help = "Give up if workers have not finished after this many seconds [default: 3600]"
        )]
        timeout_secs: Option<u64>,

        #[arg(long, help = "Read chunks through a memory map")]
        mmap: bool,

        #[arg(
            long,
            help = "Reject malformed temperature fields instead of parsing them best effort"
        )]
        strict: bool,

        #[arg(long, help = "Also print the report to stdout")]
        print: bool,
    },

    /// Show how the input would be split between workers
    Plan {
        #[arg(short, long, default_value = DEFAULT_INPUT_FILE, help = "Input measurements file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Worker threads [default: half the available cores, at least 2]"
        )]
        workers: Option<usize>,
    },
}
