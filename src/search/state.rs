//! Mutable search state and the scoped placement guard.

use fixedbitset::FixedBitSet;
use std::ops::{Deref, DerefMut};

use crate::models::{ClassSchedule, Lesson, OccupancyIndex, Slot};

/// Canonical memo key: subject index, one code per grid cell, used slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct MemoKey {
    depth: u32,
    cells: Box<[u32]>,
    used: FixedBitSet,
}

/// Everything the search mutates while descending.
///
/// `codes[i]` is 0 for an empty cell and the interned lesson code otherwise.
#[derive(Debug)]
pub(super) struct SearchState<'o> {
    pub(super) schedule: ClassSchedule,
    pub(super) used: FixedBitSet,
    pub(super) codes: Vec<u32>,
    pub(super) occupancy: &'o mut OccupancyIndex,
}

impl<'o> SearchState<'o> {
    pub(super) fn new(
        schedule: ClassSchedule,
        used: FixedBitSet,
        codes: Vec<u32>,
        occupancy: &'o mut OccupancyIndex,
    ) -> Self {
        debug_assert_eq!(used.len(), codes.len());
        Self {
            schedule,
            used,
            codes,
            occupancy,
        }
    }

    pub(super) fn memo_key(&self, depth: usize) -> MemoKey {
        MemoKey {
            depth: depth as u32,
            cells: self.codes.clone().into_boxed_slice(),
            used: self.used.clone(),
        }
    }
}

/// A lesson placed for the lifetime of the guard.
///
/// Dropping the guard removes the lesson, clears the used bit and releases
/// the teacher from the occupancy index, so every exit path of a recursive
/// call restores the state it was given.
pub(super) struct Placement<'s, 'o> {
    state: &'s mut SearchState<'o>,
    slot: Slot,
    index: usize,
    committed: bool,
}

impl<'s, 'o> Placement<'s, 'o> {
    pub(super) fn new(
        state: &'s mut SearchState<'o>,
        slot: Slot,
        index: usize,
        lesson: Lesson,
        code: u32,
    ) -> Self {
        let committed = match lesson.teacher.as_deref() {
            Some(teacher) => state.occupancy.commit(slot, teacher),
            None => false,
        };
        let replaced = state.schedule.insert(slot, lesson);
        debug_assert!(replaced.is_none(), "placed over an occupied slot {slot}");
        state.used.insert(index);
        state.codes[index] = code;
        Self {
            state,
            slot,
            index,
            committed,
        }
    }
}

impl Drop for Placement<'_, '_> {
    fn drop(&mut self) {
        let lesson = self.state.schedule.remove(self.slot);
        self.state.used.set(self.index, false);
        self.state.codes[self.index] = 0;
        if self.committed {
            if let Some(teacher) = lesson.and_then(|l| l.teacher) {
                self.state.occupancy.release(self.slot, &teacher);
            }
        }
    }
}

impl<'o> Deref for Placement<'_, 'o> {
    type Target = SearchState<'o>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<'o> DerefMut for Placement<'_, 'o> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}
