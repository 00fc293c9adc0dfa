//! Settle detection and face resolution
//!
//! - `detector` - the per-die `Idle -> Rolling -> Resolved` state machine
//! - `resolve` - the tiered strategies that turn an orientation into a value

pub mod detector;
pub mod resolve;

pub use detector::*;
pub use resolve::*;
