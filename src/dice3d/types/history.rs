//! In-memory roll history
//!
//! Finished rolls are kept newest-first and capped. Persisting them is left
//! to whoever consumes the records.

use std::collections::VecDeque;

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CompletionKind, DiceType, RollOutcome, DEFAULT_HISTORY_CAPACITY};

/// One finished roll as stored in the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollRecord {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub die_type: DiceType,
    pub die_count: usize,
    pub values: Vec<u32>,
    pub total: u32,
    pub completion: CompletionKind,
}

/// Sink for finalized roll outcomes.
pub trait HistoryStore {
    fn record(
        &mut self,
        outcome: &RollOutcome,
        completion: CompletionKind,
        timestamp: DateTime<Utc>,
    ) -> &RollRecord;
}

/// Resource holding the most recent rolls, newest first
#[derive(Resource, Debug, Clone)]
pub struct RollHistory {
    records: VecDeque<RollRecord>,
    capacity: usize,
    next_id: u64,
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RollHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent roll, if any.
    pub fn latest(&self) -> Option<&RollRecord> {
        self.records.front()
    }

    /// Records from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &RollRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl HistoryStore for RollHistory {
    fn record(
        &mut self,
        outcome: &RollOutcome,
        completion: CompletionKind,
        timestamp: DateTime<Utc>,
    ) -> &RollRecord {
        let record = RollRecord {
            id: self.next_id,
            timestamp,
            die_type: outcome.die_type(),
            die_count: outcome.die_count(),
            values: outcome.values().to_vec(),
            total: outcome.total(),
            completion,
        };
        self.next_id += 1;

        self.records.push_front(record);
        self.records.truncate(self.capacity);
        &self.records[0]
    }
}
