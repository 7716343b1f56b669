pub mod chunk_planner;
pub mod chunk_reader;
pub mod record_parser;

pub use chunk_planner::{estimate_chunks, ChunkPlanner};
pub use chunk_reader::{ChunkReader, LineAccumulator};
pub use record_parser::{fold_record, parse_tenths, ParseMode};
