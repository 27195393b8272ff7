//! Cross-class teacher occupancy.
//!
//! The occupancy index records which teachers are committed to which slot
//! by any class scheduled so far. It is the only state shared between
//! classes; it is passed by `&mut` from the orchestrator down to the search
//! engine and never stored globally.

use std::collections::{BTreeMap, BTreeSet};

use super::{ClassSchedule, Slot};

/// Slot → set of committed teacher ids.
///
/// Invariant: entries are never empty; releasing the last teacher of a slot
/// removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    entries: BTreeMap<Slot, BTreeSet<String>>,
}

impl OccupancyIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `teacher` is committed at `slot`.
    #[inline]
    pub fn is_committed(&self, slot: Slot, teacher: &str) -> bool {
        self.entries
            .get(&slot)
            .is_some_and(|teachers| teachers.contains(teacher))
    }

    /// Commits `teacher` at `slot`. Returns `false` if it was already committed.
    pub fn commit(&mut self, slot: Slot, teacher: &str) -> bool {
        self.entries
            .entry(slot)
            .or_default()
            .insert(teacher.to_string())
    }

    /// Releases `teacher` from `slot`. Returns `false` if it was not committed.
    pub fn release(&mut self, slot: Slot, teacher: &str) -> bool {
        let Some(teachers) = self.entries.get_mut(&slot) else {
            return false;
        };
        let removed = teachers.remove(teacher);
        if teachers.is_empty() {
            self.entries.remove(&slot);
        }
        removed
    }

    /// Commits every assigned teacher of `schedule`.
    pub fn commit_schedule(&mut self, schedule: &ClassSchedule) {
        for (slot, lesson) in schedule.lessons() {
            if let Some(teacher) = &lesson.teacher {
                self.commit(slot, teacher);
            }
        }
    }

    /// Teachers committed at `slot`.
    pub fn teachers_at(&self, slot: Slot) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .get(&slot)
            .into_iter()
            .flat_map(|teachers| teachers.iter().map(String::as_str))
    }

    /// Slots where `teacher` is committed, in canonical order.
    pub fn slots_of<'a>(&'a self, teacher: &'a str) -> impl Iterator<Item = Slot> + 'a {
        self.entries
            .iter()
            .filter(move |(_, teachers)| teachers.contains(teacher))
            .map(|(slot, _)| *slot)
    }

    /// Number of slots with at least one committed teacher.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of (slot, teacher) commitments.
    pub fn commitment_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    /// Whether nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
