//! System-wide default constants.
//!
//! Grouped by subsystem. Config structs fall back to these when a key is absent.

// ============================================================================
// Request Defaults
// ============================================================================

/// Lower bound used when a blend row omits `min` (percent).
pub const DEFAULT_MIN_PERCENT: f64 = 0.0;

/// Upper bound used when a blend row omits `max` (percent).
pub const DEFAULT_MAX_PERCENT: f64 = 100.0;

/// Incumbent share used when a blend row omits `current` (percent).
pub const DEFAULT_CURRENT_PERCENT: f64 = 0.0;

/// Largest cost or GCV accepted from a blend row; larger values are clamped.
pub const MAX_ROW_MAGNITUDE: f64 = 1e12;

// ============================================================================
// Optimizer Limits
// ============================================================================

/// Maximum number of coals accepted in one optimization.
pub const DEFAULT_MAX_COALS: usize = 12;

/// Ceiling on feasible combinations per optimization.
///
/// Four unbounded coals give 176 851 combinations; five give 4 598 126.
pub const DEFAULT_MAX_COMBINATIONS: u64 = 250_000;

/// Wall-clock budget for one enumeration (ms).
pub const DEFAULT_TIME_BUDGET_MS: u64 = 10_000;

/// Concurrent optimizations; 0 means one per available CPU.
pub const DEFAULT_WORKERS: usize = 0;

/// Hard upper bound on `optimizer.max_coals`.
///
/// Past this the exact-count pass alone gets expensive and no realistic bound
/// set stays under the combination ceiling.
pub const MAX_COALS_LIMIT: usize = 100;

// ============================================================================
// HTTP Server
// ============================================================================

/// Default bind address.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Request body limit (bytes). 1 MiB holds thousands of blend rows.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Env var overriding `server.addr`.
pub const SERVER_ADDR_ENV: &str = "COALBLEND_SERVER_ADDR";

/// Env var pointing at a config file.
pub const CONFIG_PATH_ENV: &str = "COALBLEND_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "blend_config.toml";
