//! UI-related types and components
//!
//! The host scene is deliberately small: a results text, the die/count the
//! keyboard has selected, and how finished rolls are echoed to stdout.

use bevy::prelude::*;

use super::dice::DiceType;
use super::outcome::{RollRequest, MAX_DICE_PER_ROLL, MIN_DICE_PER_ROLL};

// ============================================================================
// Scene markers
// ============================================================================

/// Marker for the text node showing roll state and results
#[derive(Component)]
pub struct ResultsText;

/// Marker for the main 3D camera
#[derive(Component)]
pub struct MainCamera;

// ============================================================================
// Selection
// ============================================================================

/// Die type and count chosen from the keyboard for the next roll
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollSelection {
    pub die_type: DiceType,
    pub count: usize,
}

impl Default for RollSelection {
    fn default() -> Self {
        Self::from(RollRequest::default())
    }
}

impl From<RollRequest> for RollSelection {
    fn from(request: RollRequest) -> Self {
        Self {
            die_type: request.die_type,
            count: request.die_count,
        }
    }
}

impl RollSelection {
    /// Change the count by `delta`, staying within the per-roll limits.
    pub fn adjust_count(&mut self, delta: i32) {
        let count = self.count as i32 + delta;
        self.count = count.clamp(MIN_DICE_PER_ROLL as i32, MAX_DICE_PER_ROLL as i32) as usize;
    }

    pub fn request(&self) -> RollRequest {
        RollRequest::new(self.die_type, self.count as i32)
    }
}

// ============================================================================
// Reporting
// ============================================================================

/// How completed rolls are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Nothing is printed.
    #[default]
    Silent,
    /// Colored one-line summary.
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Resource selecting the stdout report format
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RollReport {
    pub format: ReportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_count_stays_in_range() {
        let mut selection = RollSelection::default();
        selection.adjust_count(-3);
        assert_eq!(selection.count, 1);

        selection.adjust_count(25);
        assert_eq!(selection.count, 10);

        selection.adjust_count(-2);
        assert_eq!(selection.request().die_count, 8);
    }
}
