//! Class schedule (solution) model.
//!
//! A class schedule maps grid slots to lessons. It is stored as one cell per
//! slot of the grid, so placing and removing a lesson during search never
//! allocates map nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Slot, SlotGrid};

/// A lesson occupying one slot of one class.
///
/// `teacher == None` means no qualifying teacher was found. Such a lesson
/// still counts toward class and subject limits but never toward teacher
/// limits or the occupancy index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lesson {
    /// Subject name.
    pub subject: String,
    /// Teacher identifier, if one is assigned.
    pub teacher: Option<String>,
}

impl Lesson {
    /// Creates a lesson.
    pub fn new(subject: impl Into<String>, teacher: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            teacher,
        }
    }

    /// Creates a lesson taught by `teacher`.
    pub fn assigned(subject: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self::new(subject, Some(teacher.into()))
    }

    /// Creates a lesson without a teacher.
    pub fn unassigned(subject: impl Into<String>) -> Self {
        Self::new(subject, None)
    }

    /// Whether a teacher is assigned.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.teacher.is_some()
    }

    /// Whether this lesson is taught by `teacher`.
    #[inline]
    pub fn is_taught_by(&self, teacher: &str) -> bool {
        self.teacher.as_deref() == Some(teacher)
    }
}

/// Weekly schedule of one class.
///
/// Invariant: at most one lesson per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSchedule {
    days: usize,
    periods: usize,
    cells: Vec<Option<Lesson>>,
}

impl ClassSchedule {
    /// Creates an empty schedule shaped like `grid`.
    pub fn new(grid: &SlotGrid) -> Self {
        Self {
            days: grid.day_count(),
            periods: grid.period_count(),
            cells: vec![None; grid.len()],
        }
    }

    #[inline]
    fn cell_index(&self, slot: Slot) -> Option<usize> {
        if (slot.day as usize) < self.days && (slot.period as usize) < self.periods {
            Some(slot.day as usize * self.periods + slot.period as usize)
        } else {
            None
        }
    }

    #[inline]
    fn slot_at(&self, index: usize) -> Slot {
        Slot::new((index / self.periods) as u8, (index % self.periods) as u8)
    }

    /// Number of days in the underlying grid.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days
    }

    /// Number of periods per day in the underlying grid.
    #[inline]
    pub fn period_count(&self) -> usize {
        self.periods
    }

    /// Lesson at `slot`, if any.
    #[inline]
    pub fn get(&self, slot: Slot) -> Option<&Lesson> {
        self.cell_index(slot)
            .and_then(|i| self.cells[i].as_ref())
    }

    /// Whether `slot` holds a lesson.
    #[inline]
    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// Places `lesson` at `slot`, returning the lesson it replaced.
    ///
    /// # Panics
    /// Panics if `slot` lies outside the grid this schedule was built for.
    pub fn insert(&mut self, slot: Slot, lesson: Lesson) -> Option<Lesson> {
        let index = self
            .cell_index(slot)
            .unwrap_or_else(|| panic!("slot {slot} lies outside the schedule grid"));
        self.cells[index].replace(lesson)
    }

    /// Removes and returns the lesson at `slot`.
    pub fn remove(&mut self, slot: Slot) -> Option<Lesson> {
        let index = self.cell_index(slot)?;
        self.cells[index].take()
    }

    /// All lessons in canonical slot order.
    pub fn lessons(&self) -> impl Iterator<Item = (Slot, &Lesson)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|l| (self.slot_at(i), l)))
    }

    /// Lessons of one day in period order.
    pub fn lessons_on(&self, day: u8) -> impl Iterator<Item = (Slot, &Lesson)> + '_ {
        let start = (day as usize * self.periods).min(self.cells.len());
        let end = (start + self.periods).min(self.cells.len());
        self.cells[start..end]
            .iter()
            .enumerate()
            .filter_map(move |(p, cell)| cell.as_ref().map(|l| (Slot::new(day, p as u8), l)))
    }

    /// Occupied slots in canonical order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.lessons().map(|(slot, _)| slot)
    }

    /// Number of lessons on `day`.
    pub fn count_on(&self, day: u8) -> usize {
        self.lessons_on(day).count()
    }

    /// Number of lessons of `subject` on `day`.
    pub fn count_subject_on(&self, day: u8, subject: &str) -> usize {
        self.lessons_on(day)
            .filter(|(_, l)| l.subject == subject)
            .count()
    }

    /// Number of lessons taught by `teacher` on `day`.
    pub fn count_teacher_on(&self, day: u8, teacher: &str) -> usize {
        self.lessons_on(day)
            .filter(|(_, l)| l.is_taught_by(teacher))
            .count()
    }

    /// Returns all lessons taught by `teacher`.
    pub fn lessons_for_teacher<'a>(
        &'a self,
        teacher: &'a str,
    ) -> impl Iterator<Item = (Slot, &'a Lesson)> + 'a {
        self.lessons().filter(move |(_, l)| l.is_taught_by(teacher))
    }

    /// Lesson count per subject.
    pub fn subject_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (_, lesson) in self.lessons() {
            *counts.entry(lesson.subject.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of placed lessons.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether no lesson is placed.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Exports as day label → period label → lesson.
    ///
    /// Slots outside `grid` are skipped.
    pub fn to_named(&self, grid: &SlotGrid) -> BTreeMap<String, BTreeMap<String, Lesson>> {
        let mut named: BTreeMap<String, BTreeMap<String, Lesson>> = BTreeMap::new();
        for (slot, lesson) in self.lessons() {
            if let (Some(day), Some(period)) =
                (grid.day_label(slot.day), grid.period_label(slot.period))
            {
                named
                    .entry(day.to_string())
                    .or_default()
                    .insert(period.to_string(), lesson.clone());
            }
        }
        named
    }
}

/// A hard-constraint violation found when auditing a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Class the violation belongs to.
    pub class_id: String,
    /// Offending slot, when the violation is tied to one.
    pub slot: Option<Slot>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A class has more lessons on a day than the class daily limit.
    ClassDailyLimitExceeded,
    /// A subject occurs more often on a day than allowed.
    SubjectDailyCapExceeded,
    /// A teacher teaches more lessons of one class on a day than allowed.
    TeacherDailyLoadExceeded,
    /// A teacher is booked by two classes in the same slot.
    TeacherDoubleBooked,
    /// Fewer lessons were placed than required.
    MissingLessons,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        class_id: impl Into<String>,
        slot: Option<Slot>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            class_id: class_id.into(),
            slot,
            message: message.into(),
        }
    }
}
