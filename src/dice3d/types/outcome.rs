//! Roll requests and the aggregated outcome of a finished roll.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DiceType, RollError, RollResult};

/// Fewest dice a single roll may throw.
pub const MIN_DICE_PER_ROLL: usize = 1;
/// Most dice a single roll may throw.
pub const MAX_DICE_PER_ROLL: usize = 10;

/// Clamp a requested die count into `[MIN_DICE_PER_ROLL, MAX_DICE_PER_ROLL]`.
///
/// Out-of-range requests are never an error.
pub fn clamp_die_count(requested: i32) -> usize {
    requested.clamp(MIN_DICE_PER_ROLL as i32, MAX_DICE_PER_ROLL as i32) as usize
}

/// What to throw on the next roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    pub die_type: DiceType,
    pub die_count: usize,
}

impl RollRequest {
    pub fn new(die_type: DiceType, requested_count: i32) -> Self {
        Self {
            die_type,
            die_count: clamp_die_count(requested_count),
        }
    }
}

impl Default for RollRequest {
    fn default() -> Self {
        Self::new(DiceType::D6, 1)
    }
}

/// How a roll session reached completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    /// Every die settled on its own before the timeout.
    Natural,
    /// The global timeout forced the remaining dice.
    TimedOut,
    /// An explicit force-stop request forced the remaining dice.
    Cancelled,
}

impl CompletionKind {
    pub fn is_forced(&self) -> bool {
        !matches!(self, CompletionKind::Natural)
    }
}

impl fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompletionKind::Natural => "natural",
            CompletionKind::TimedOut => "timed out",
            CompletionKind::Cancelled => "cancelled",
        })
    }
}

/// The immutable result of one roll session.
///
/// Values are kept in spawn order and the outcome owns its own copy, so tearing
/// down the dice afterwards cannot change it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    die_type: DiceType,
    die_count: usize,
    values: Vec<u32>,
    total: u32,
}

impl RollOutcome {
    /// Build an outcome from per-die value slots in spawn order.
    ///
    /// Fails on the first empty slot.
    pub fn from_slots<I>(die_type: DiceType, slots: I) -> RollResult<Self>
    where
        I: IntoIterator<Item = Option<u32>>,
    {
        let mut values = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(value) => values.push(value),
                None => return Err(RollError::UnresolvedDie { index }),
            }
        }

        if values.is_empty() {
            return Err(RollError::EmptyRoll);
        }

        Ok(Self {
            die_type,
            die_count: values.len(),
            total: values.iter().sum(),
            values,
        })
    }

    pub fn die_type(&self) -> DiceType {
        self.die_type
    }

    pub fn die_count(&self) -> usize {
        self.die_count
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        if self.die_count == 1 {
            write!(f, "{}: {}", self.die_type, self.total)
        } else {
            write!(
                f,
                "{}x{}: {} = {}",
                self.die_count,
                self.die_type,
                values.join(" + "),
                self.total
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_die_count() {
        assert_eq!(clamp_die_count(-5), 1);
        assert_eq!(clamp_die_count(0), 1);
        assert_eq!(clamp_die_count(1), 1);
        assert_eq!(clamp_die_count(7), 7);
        assert_eq!(clamp_die_count(10), 10);
        assert_eq!(clamp_die_count(12), 10);
        assert_eq!(clamp_die_count(i32::MAX), 10);
    }

    #[test]
    fn test_roll_request_default() {
        let request = RollRequest::default();
        assert_eq!(request.die_type, DiceType::D6);
        assert_eq!(request.die_count, 1);
    }

    #[test]
    fn test_outcome_from_slots() {
        let outcome =
            RollOutcome::from_slots(DiceType::D6, vec![Some(3), Some(5), Some(1)]).unwrap();
        assert_eq!(outcome.die_count(), 3);
        assert_eq!(outcome.values(), &[3, 5, 1]);
        assert_eq!(outcome.total(), 9);
        assert_eq!(outcome.to_string(), "3xD6: 3 + 5 + 1 = 9");
    }

    #[test]
    fn test_outcome_rejects_unresolved_die() {
        let err = RollOutcome::from_slots(DiceType::D8, vec![Some(2), None, Some(4)]).unwrap_err();
        assert!(matches!(err, RollError::UnresolvedDie { index: 1 }));
    }

    #[test]
    fn test_outcome_rejects_empty_roll() {
        let err = RollOutcome::from_slots(DiceType::D8, Vec::new()).unwrap_err();
        assert!(matches!(err, RollError::EmptyRoll));
    }

    #[test]
    fn test_single_die_display() {
        let outcome = RollOutcome::from_slots(DiceType::D20, vec![Some(17)]).unwrap();
        assert_eq!(outcome.to_string(), "D20: 17");
    }

    #[test]
    fn test_completion_kind_forced() {
        assert!(!CompletionKind::Natural.is_forced());
        assert!(CompletionKind::TimedOut.is_forced());
        assert!(CompletionKind::Cancelled.is_forced());
    }
}
