use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, StationMap};
use crate::processors::Aggregator;
use crate::readers::{ChunkPlanner, ChunkReader};
use crate::utils::progress::ProgressReporter;
use crossbeam::channel::{self, RecvTimeoutError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub struct ParallelProcessor {
    max_workers: usize,
    timeout: Duration,
    reader: ChunkReader,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            timeout: ProcessingConfig::default().timeout(),
            reader: ChunkReader::new(),
        }
    }

    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self {
            max_workers: config.workers,
            timeout: config.timeout(),
            reader: ChunkReader::from_config(config),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_reader(mut self, reader: ChunkReader) -> Self {
        self.reader = reader;
        self
    }

    /// Plan, scan every chunk in parallel, then merge into the global map.
    pub fn process_file(
        &self,
        input: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<StationMap> {
        let chunks = ChunkPlanner::new(self.max_workers).plan_file(input)?;
        info!(
            input = %input.display(),
            chunks = chunks.len(),
            "scanning input"
        );

        let locals = self.process_chunks(input, &chunks, progress)?;

        if let Some(p) = progress {
            p.set_message("Merging chunk results...");
        }

        let global = Aggregator::merge_all(locals);
        info!(stations = global.len(), "merged chunk results");
        Ok(global)
    }

    /// Scan `chunks` on a pool of `max_workers` threads.
    ///
    /// Returns one map per chunk, in chunk order, once every worker reported.
    /// The first worker error, a lost worker or an expired timeout aborts the
    /// whole run.
    pub fn process_chunks(
        &self,
        input: &Path,
        chunks: &[Chunk],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<StationMap>> {
        let reader = self.reader;
        let path: PathBuf = input.to_path_buf();
        self.run_chunks(chunks, progress, move |chunk| reader.read_chunk(&path, chunk))
    }

    fn run_chunks<F>(
        &self,
        chunks: &[Chunk],
        progress: Option<&ProgressReporter>,
        scan: F,
    ) -> Result<Vec<StationMap>>
    where
        F: Fn(Chunk) -> Result<StationMap> + Send + Sync + 'static,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|i| format!("chunk-worker-{}", i))
            .panic_handler(|_| error!("chunk worker panicked"))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let scan = Arc::new(scan);
        let (tx, rx) = channel::bounded(chunks.len());
        for (index, chunk) in chunks.iter().copied().enumerate() {
            let tx = tx.clone();
            let scan = Arc::clone(&scan);
            pool.spawn(move || {
                let started = Instant::now();
                let result = scan(chunk);
                debug!(index, %chunk, elapsed = ?started.elapsed(), "chunk finished");
                // the receiver only disappears after an earlier failure
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        // a timeout too large to represent means no deadline at all
        let deadline = Instant::now().checked_add(self.timeout);
        let mut locals: Vec<Option<StationMap>> = (0..chunks.len()).map(|_| None).collect();

        for _ in 0..chunks.len() {
            let received = match deadline {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((index, result)) => {
                    locals[index] = Some(result?);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(ProcessingError::Timeout(self.timeout))
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        locals
            .into_iter()
            .enumerate()
            .map(|(chunk, local)| local.ok_or(ProcessingError::WorkerLost { chunk }))
            .collect()
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::from_config(&ProcessingConfig::default())
    }
}
