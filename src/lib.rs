//! Physics-observed dice rolling on Bevy and Rapier.

pub mod dice3d;
