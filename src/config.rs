use crate::error::Result;
use crate::utils::constants::{default_workers, DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// Tunables of a processing run.
///
/// Values come from an optional configuration file (any format the `config`
/// crate understands, picked by extension), CLI flags override them, and the
/// result is validated before any work starts.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ProcessingConfig {
    #[validate(range(min = 1))]
    pub workers: usize,

    #[validate(range(min = 1))]
    pub buffer_size: usize,

    #[validate(range(min = 1))]
    pub timeout_secs: u64,

    pub use_mmap: bool,

    pub strict: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_mmap: false,
            strict: false,
        }
    }
}

impl ProcessingConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
