use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::models::{Chunk, StationMap};
use crate::readers::record_parser::{fold_record, ParseMode};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, LINE_BUFFER_CAPACITY, LOCAL_MAP_CAPACITY};
use memmap2::Mmap;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Reusable record buffer fed with raw bytes.
///
/// `\r` is dropped, `\n` completes a record, anything else is appended. The
/// buffer is cleared between records and only ever grows.
pub struct LineAccumulator {
    line: Vec<u8>,
    mode: ParseMode,
}

impl LineAccumulator {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            line: Vec::with_capacity(LINE_BUFFER_CAPACITY),
            mode,
        }
    }

    pub fn feed(&mut self, bytes: &[u8], stats: &mut StationMap) -> Result<()> {
        for &b in bytes {
            match b {
                b'\n' => self.flush(stats)?,
                b'\r' => {}
                _ => self.line.push(b),
            }
        }
        Ok(())
    }

    /// Process whatever is left as a final, unterminated record.
    pub fn finish(mut self, stats: &mut StationMap) -> Result<()> {
        self.flush(stats)
    }

    fn flush(&mut self, stats: &mut StationMap) -> Result<()> {
        if !self.line.is_empty() {
            fold_record(&self.line, stats, self.mode)?;
            self.line.clear();
        }
        Ok(())
    }
}

/// Scans one chunk of the input into a chunk-local station map.
#[derive(Debug, Clone, Copy)]
pub struct ChunkReader {
    buffer_size: usize,
    use_mmap: bool,
    mode: ParseMode,
}

impl ChunkReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            use_mmap: false,
            mode: ParseMode::Lenient,
        }
    }

    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new()
            .with_buffer_size(config.buffer_size)
            .with_mmap(config.use_mmap)
            .with_mode(if config.strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            })
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Read a chunk of the file at `path`, opening a dedicated handle.
    pub fn read_chunk(&self, path: &Path, chunk: Chunk) -> Result<StationMap> {
        let file = File::open(path)?;
        if self.use_mmap {
            self.read_chunk_mmap(&file, chunk)
        } else {
            self.read_chunk_buffered(file, chunk)
        }
    }

    /// Read `chunk` from any seekable source through the transfer buffer.
    pub fn read_chunk_buffered<R: Read + Seek>(
        &self,
        mut source: R,
        chunk: Chunk,
    ) -> Result<StationMap> {
        let mut stats =
            StationMap::with_capacity_and_hasher(LOCAL_MAP_CAPACITY, Default::default());
        let mut accumulator = LineAccumulator::new(self.mode);

        if chunk.is_empty() {
            return Ok(stats);
        }

        source.seek(SeekFrom::Start(chunk.start))?;
        let mut buffer = vec![0u8; self.buffer_size];
        let mut remaining = chunk.len();

        while remaining > 0 {
            let want = remaining.min(buffer.len() as u64) as usize;
            let read = match source.read(&mut buffer[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            accumulator.feed(&buffer[..read], &mut stats)?;
            remaining -= read as u64;
        }

        accumulator.finish(&mut stats)?;
        debug!(%chunk, stations = stats.len(), "chunk scanned");
        Ok(stats)
    }

    fn read_chunk_mmap(&self, file: &File, chunk: Chunk) -> Result<StationMap> {
        let mut stats =
            StationMap::with_capacity_and_hasher(LOCAL_MAP_CAPACITY, Default::default());
        if chunk.is_empty() {
            return Ok(stats);
        }

        // SAFETY: the input is treated as read-only for the duration of the run.
        let mmap = unsafe { Mmap::map(file)? };
        let end = (chunk.end as usize).min(mmap.len());
        let start = (chunk.start as usize).min(end);

        let mut accumulator = LineAccumulator::new(self.mode);
        accumulator.feed(&mmap[start..end], &mut stats)?;
        accumulator.finish(&mut stats)?;
        debug!(%chunk, stations = stats.len(), "chunk scanned (mmap)");
        Ok(stats)
    }
}

impl Default for ChunkReader {
    fn default() -> Self {
        Self::new()
    }
}
