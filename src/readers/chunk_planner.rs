use crate::error::{ProcessingError, Result};
use crate::models::Chunk;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Splits an input into line-aligned byte ranges, one per worker.
pub struct ChunkPlanner {
    workers: usize,
}

impl ChunkPlanner {
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Plan chunks for the file at `path`.
    pub fn plan_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();
        self.plan(&mut file, file_size)
    }

    /// Plan chunks over `source`, which holds `file_size` bytes.
    ///
    /// Every internal boundary is moved forward to the next line start, so a
    /// record always belongs to the chunk its first byte was estimated into
    /// or to an earlier one. Consecutive chunks share their boundary.
    pub fn plan<R: Read + Seek>(&self, source: &mut R, file_size: u64) -> Result<Vec<Chunk>> {
        if self.workers == 0 {
            return Err(ProcessingError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }

        let estimated = estimate_chunks(file_size, self.workers);
        let mut chunks = Vec::with_capacity(estimated.len());
        let mut start = 0;

        for (i, estimate) in estimated.iter().enumerate() {
            let end = if i + 1 == estimated.len() {
                file_size
            } else {
                next_line_start(source, estimate.end, file_size)?
            };
            // an earlier boundary may already have run past this estimate
            let start_clamped = start.min(end);
            chunks.push(Chunk::new(start_clamped, end));
            start = end;
        }

        debug!(file_size, workers = self.workers, ?chunks, "planned chunks");
        Ok(chunks)
    }
}

/// Contiguous ranges of `file_size / workers` bytes; the last absorbs the remainder.
pub fn estimate_chunks(file_size: u64, workers: usize) -> Vec<Chunk> {
    let workers = workers.max(1) as u64;
    let chunk_size = file_size / workers;

    (0..workers)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i == workers - 1 {
                file_size
            } else {
                start + chunk_size
            };
            Chunk::new(start, end)
        })
        .collect()
}

/// Smallest line start at or after `pos`, reading one byte at a time.
///
/// `pos` is already a line start when it is 0 or the byte before it is a
/// newline. Returns `file_size` when no newline follows.
fn next_line_start<R: Read + Seek>(source: &mut R, pos: u64, file_size: u64) -> Result<u64> {
    if pos == 0 {
        return Ok(0);
    }
    if pos >= file_size {
        return Ok(file_size);
    }

    let mut byte = [0u8; 1];
    let mut cur = pos - 1;
    source.seek(SeekFrom::Start(cur))?;
    while cur < file_size {
        source.read_exact(&mut byte)?;
        if byte[0] == b'\n' {
            return Ok(cur + 1);
        }
        cur += 1;
    }

    Ok(file_size)
}
