pub mod chunk;
pub mod station;
pub mod stats;

pub use chunk::Chunk;
pub use station::{station_hash, StationKey, StationName};
pub use stats::StationStats;

use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

/// Station key to stats mapping, used both per chunk and globally.
pub type StationMap = hashbrown::HashMap<StationKey, StationStats, BuildHasherDefault<FxHasher>>;
