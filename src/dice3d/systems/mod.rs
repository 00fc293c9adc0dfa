//! Systems module for dice3d
//!
//! This module contains the Bevy systems for the 3D dice roller,
//! organized into submodules by functionality:
//!
//! - `bodies`: ECS adapters the roll orchestrator spawns and samples through
//! - `dice`: Roll commands, collision routing, settle polling and history
//! - `input`: Keyboard input handling
//! - `results`: Results text and stdout reporting
//! - `setup`: Scene initialization (camera, light, dice box, UI)

mod bodies;
mod dice;
mod input;
mod results;
mod setup;

// Re-export all public systems
pub use bodies::{DiceRoller, DieBodies, DieBodyQuery, EcsSpawnHost};
pub use dice::{advance_roll, handle_roll_commands, record_roll_history, track_die_collisions};
pub use input::handle_input;
pub use results::{format_pretty, report_completed_rolls, update_results_display};
pub use setup::{setup, spawn_dice_box, BOX_HALF_SIZE, WALL_HEIGHT};
