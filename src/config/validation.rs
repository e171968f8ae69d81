//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Unknown keys never break a config.

use std::collections::HashSet;
use std::net::SocketAddr;

use super::defaults::MAX_COALS_LIMIT;
use super::BlendConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for BlendConfig.
///
/// Must be kept in step with the structs in blend_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        "server.max_body_bytes",
        "server.cors_origins",
        // [optimizer]
        "optimizer",
        "optimizer.max_coals",
        "optimizer.max_combinations",
        "optimizer.time_budget_ms",
        "optimizer.workers",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Edit distance between two strings, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve alphabetically so the suggestion does not depend on set order.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Only warns; parse errors are left to the serde pass.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate value ranges on a parsed BlendConfig.
///
/// Returns (errors, warnings). Errors are values the service cannot run with;
/// warnings are legal but likely mistakes.
/// Whether `addr` reads as a bind address: a socket address, or a host name
/// followed by `:port`. Names are not resolved here; that happens at bind.
pub fn is_bind_address(addr: &str) -> bool {
    if addr.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            port.parse::<u16>().is_ok()
                && !host.is_empty()
                && host
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        }
        None => false,
    }
}

pub fn validate_ranges(config: &BlendConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let o = &config.optimizer;
    if o.max_coals == 0 || o.max_coals > MAX_COALS_LIMIT {
        errors.push(format!(
            "optimizer.max_coals = {} must be between 1 and {MAX_COALS_LIMIT}",
            o.max_coals
        ));
    }
    if o.max_combinations == 0 {
        errors.push("optimizer.max_combinations must be > 0".to_string());
    }
    if o.time_budget_ms == 0 {
        errors.push("optimizer.time_budget_ms must be > 0".to_string());
    }

    let s = &config.server;
    if !is_bind_address(&s.addr) {
        errors.push(format!("server.addr = '{}' is not a valid HOST:PORT address", s.addr));
    }
    if s.max_body_bytes == 0 {
        errors.push("server.max_body_bytes must be > 0".to_string());
    }

    if o.max_combinations > 50_000_000 {
        warnings.push(ValidationWarning {
            field: "optimizer.max_combinations".to_string(),
            message: format!(
                "optimizer.max_combinations = {} materializes very large candidate sets in memory",
                o.max_combinations
            ),
            suggestion: None,
        });
    }
    for origin in &s.cors_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            warnings.push(ValidationWarning {
                field: "server.cors_origins".to_string(),
                message: format!("CORS origin '{origin}' has no http(s) scheme and will never match"),
                suggestion: None,
            });
        }
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
