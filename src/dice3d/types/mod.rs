//! Type definitions for the physics dice roller
//!
//! This module is organized into submodules:
//! - `dice` - Dice types, faces and ECS markers
//! - `outcome` - Roll requests and aggregated roll outcomes
//! - `settings` - Detection, spawn and timeout settings with JSON persistence
//! - `history` - In-memory history of finished rolls
//! - `messages` - Messages exchanged with the host app
//! - `error` - Error type for roll operations
//! - `ui` - Scene markers, keyboard selection and report format

pub mod dice;
pub mod error;
pub mod history;
pub mod messages;
pub mod outcome;
pub mod settings;
pub mod ui;

// Re-export all public types for convenient access
pub use dice::*;
pub use error::*;
pub use history::*;
pub use messages::*;
pub use outcome::*;
pub use settings::*;
pub use ui::*;
