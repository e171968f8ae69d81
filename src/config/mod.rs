//! Service Configuration Module
//!
//! Server settings and optimizer limits loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `COALBLEND_CONFIG` environment variable (path to TOML file)
//! 2. `blend_config.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! The config is loaded once in `main` and handed down explicitly; the
//! optimizer only ever sees the [`OptimizerLimits`](crate::optimization::OptimizerLimits)
//! derived from it.
//!
//! ```ignore
//! let config = BlendConfig::load();
//! let optimizer = BlendOptimizer::new(config.optimizer.limits());
//! ```

mod blend_config;
pub mod defaults;
pub mod validation;

pub use blend_config::*;
