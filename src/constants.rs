// Statistics source
pub const DEFAULT_STAT_PATH: &str = "/proc/stat";
pub const CORE_ROW_PREFIX: &str = "cpu";

// Rows need user, nice, system and idle at minimum
pub const MIN_COUNTER_FIELDS: usize = 4;
pub const MAX_COUNTER_FIELDS: usize = 9;

// Monitoring settings
pub const DATA_COLLECTION_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_CORES: [usize; 4] = [0, 1, 2, 3];
pub const MAX_CORE_ID: usize = 999;

// Display settings
pub const UNAVAILABLE_MARKER: &str = "---";
pub const VALUE_COLUMN_WIDTH: usize = 6;
pub const MIN_SEPARATOR_WIDTH: usize = 60;
