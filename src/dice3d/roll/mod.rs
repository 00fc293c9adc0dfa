//! Roll orchestration, spawn placement and the collaborator seams they use.

pub mod host;
pub mod orchestrator;
pub mod spawn;

pub use host::*;
pub use orchestrator::*;
pub use spawn::*;
