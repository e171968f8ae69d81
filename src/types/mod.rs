//! Shared data structures for coal blend optimization
//!
//! - `coal`: canonical oxide vector, percentage bounds, optimizer input
//! - `blend`: evaluated blends and the optimizer result
//! - `request`: raw JSON payloads accepted at the boundary

mod blend;
mod coal;
mod request;

pub use blend::*;
pub use coal::*;
pub use request::*;
