pub mod meshes;
pub mod plugin;
pub mod roll;
pub mod settle;
pub mod systems;
pub mod types;

pub use meshes::*;
pub use plugin::*;
pub use roll::*;
pub use settle::*;
pub use systems::*;
pub use types::*;
