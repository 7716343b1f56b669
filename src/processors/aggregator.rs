use crate::models::StationMap;
use crate::utils::constants::GLOBAL_MAP_CAPACITY;
use hashbrown::hash_map::Entry;

/// Reduces chunk-local maps into the global map on the coordinating thread.
pub struct Aggregator {
    global: StationMap,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            global: StationMap::with_capacity_and_hasher(GLOBAL_MAP_CAPACITY, Default::default()),
        }
    }

    /// Fold one chunk's results in. Stations seen for the first time keep the
    /// chunk's key and stats as they are.
    pub fn absorb(&mut self, local: StationMap) {
        for (key, stats) in local {
            match self.global.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(&stats),
                Entry::Vacant(entry) => {
                    entry.insert(stats);
                }
            }
        }
    }

    pub fn into_inner(self) -> StationMap {
        self.global
    }

    /// Merge all chunk results, in order.
    pub fn merge_all<I>(locals: I) -> StationMap
    where
        I: IntoIterator<Item = StationMap>,
    {
        let mut aggregator = Self::new();
        for local in locals {
            aggregator.absorb(local);
        }
        aggregator.into_inner()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
