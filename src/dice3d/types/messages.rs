//! Messages exchanged between the roller systems and the host app.

use bevy::prelude::*;

use super::{CompletionKind, DiceType, RollOutcome};
use crate::dice3d::settle::FaceResolution;

/// Requests the host sends to the roller.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum RollCommand {
    /// Configure and start a roll. Counts outside 1..=10 are clamped.
    Roll { die_type: DiceType, count: i32 },
    /// Force every unsettled die to resolve now.
    ForceStop,
    /// Discard the current dice and outcome.
    Reset,
    /// Forget every recorded roll.
    ClearHistory,
}

/// Fired the first time a die touches anything.
#[derive(Message, Clone, Copy, Debug)]
pub struct DieStartedRolling {
    pub entity: Entity,
}

/// Fired once per die when its value is fixed.
#[derive(Message, Clone, Copy, Debug)]
pub struct DieSettled {
    pub entity: Entity,
    pub index: usize,
    pub resolution: FaceResolution,
}

/// Fired exactly once per roll session, when every die has a value.
#[derive(Message, Clone, Debug)]
pub struct RollCompleted {
    pub outcome: RollOutcome,
    pub kind: CompletionKind,
}
