/// File names
pub const DEFAULT_INPUT_FILE: &str = "measurements.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "measurements.out";
pub const DEFAULT_REPORT_MODE: u32 = 0o644;

/// Record format
pub const FIELD_SEPARATOR: u8 = b';';
pub const ENTRY_SEPARATOR: &str = ", ";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 1 << 20; // 1MB
pub const LINE_BUFFER_CAPACITY: usize = 256;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60 * 60;
pub const MIN_DEFAULT_WORKERS: usize = 2;

/// Map sizing hints
pub const LOCAL_MAP_CAPACITY: usize = 10_000;
pub const GLOBAL_MAP_CAPACITY: usize = 10_000;

/// Half the available cores, never fewer than two.
pub fn default_workers() -> usize {
    (num_cpus::get() / 2).max(MIN_DEFAULT_WORKERS)
}
