//! Input validation and timetable auditing.
//!
//! [`validate_input`] checks structural integrity of classes and teachers
//! before scheduling. Detects:
//! - Duplicate class or teacher IDs
//! - Empty subject names
//! - Fixed slots naming days or periods missing from the grid
//!
//! [`audit_timetable`] re-checks a finished timetable against the hard
//! constraints and reports every breach as a [`Violation`].

use std::collections::{BTreeMap, HashSet};

use crate::config::SolverConfig;
use crate::models::{ClassRecord, Slot, SlotGrid, Teacher, Violation, ViolationType};
use crate::scheduler::Timetable;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A requirement or fixed slot has an empty subject name.
    EmptySubject,
    /// A fixed slot names a day missing from the grid.
    UnknownDay,
    /// A fixed slot names a period missing from the grid.
    UnknownPeriod,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// Checks:
/// 1. No duplicate teacher IDs
/// 2. No duplicate class IDs
/// 3. No empty subject names in requirements or fixed slots
/// 4. All fixed-slot day and period labels exist in `grid`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(classes: &[ClassRecord], teachers: &[Teacher], grid: &SlotGrid) -> ValidationResult {
    let mut errors = Vec::new();

    let mut teacher_ids = HashSet::new();
    for t in teachers {
        if !teacher_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", t.id),
            ));
        }
    }

    let mut class_ids = HashSet::new();
    for class in classes {
        if !class_ids.insert(class.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate class ID: {}", class.id),
            ));
        }

        for req in &class.requirements {
            if req.subject.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptySubject,
                    format!("Class '{}' requires a subject with an empty name", class.id),
                ));
            }
        }

        for fixed in &class.fixed_slots {
            if fixed.subject.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptySubject,
                    format!("Class '{}' has a fixed slot with an empty subject", class.id),
                ));
            }
            if grid.day_position(&fixed.day).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDay,
                    format!("Class '{}' fixes a lesson on unknown day '{}'", class.id, fixed.day),
                ));
            }
            if grid.period_position(&fixed.period).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPeriod,
                    format!(
                        "Class '{}' fixes a lesson in unknown period '{}'",
                        class.id, fixed.period
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Slots fixed more than once in `class`, in canonical order.
///
/// Fixed slots with unknown labels are ignored.
pub fn duplicate_fixed_slots(class: &ClassRecord, grid: &SlotGrid) -> Vec<Slot> {
    let mut seen: BTreeMap<Slot, usize> = BTreeMap::new();
    for fixed in &class.fixed_slots {
        if let Some(slot) = grid.slot(&fixed.day, &fixed.period) {
            *seen.entry(slot).or_insert(0) += 1;
        }
    }
    seen.into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(slot, _)| slot)
        .collect()
}

/// Checks a finished timetable against the hard constraints.
///
/// Reports, per class: days over the class daily limit, subjects over the
/// daily cap, teachers over the daily load, and scheduled classes missing
/// required lessons. Across classes: teachers booked twice in one slot.
/// A class without a schedule yields a single `MissingLessons` entry.
///
/// Fixed lessons are checked like any other, so an over-constrained fixed
/// layout shows up here even though the search accepted it.
pub fn audit_timetable(timetable: &Timetable, classes: &[ClassRecord], config: &SolverConfig) -> Vec<Violation> {
    let grid = timetable.grid();
    let mut violations = Vec::new();
    // (slot, teacher) -> first class booking it
    let mut bookings: BTreeMap<(Slot, &str), &str> = BTreeMap::new();

    for outcome in timetable.outcomes() {
        let id = outcome.class_id.as_str();
        let schedule = &outcome.schedule;

        for day in 0..grid.day_count() as u8 {
            let day_label = grid.day_label(day).unwrap_or_default();
            let count = schedule.count_on(day);
            if count > config.class_daily_limit {
                violations.push(Violation::new(
                    ViolationType::ClassDailyLimitExceeded,
                    id,
                    None,
                    format!("{count} lessons on {day_label}, limit {}", config.class_daily_limit),
                ));
            }

            let mut per_subject: BTreeMap<&str, usize> = BTreeMap::new();
            let mut per_teacher: BTreeMap<&str, usize> = BTreeMap::new();
            for (_, lesson) in schedule.lessons_on(day) {
                *per_subject.entry(lesson.subject.as_str()).or_insert(0) += 1;
                if let Some(teacher) = lesson.teacher.as_deref() {
                    *per_teacher.entry(teacher).or_insert(0) += 1;
                }
            }
            for (subject, n) in per_subject {
                if n > config.max_same_subject_per_day {
                    violations.push(Violation::new(
                        ViolationType::SubjectDailyCapExceeded,
                        id,
                        None,
                        format!(
                            "{n} lessons of '{subject}' on {day_label}, cap {}",
                            config.max_same_subject_per_day
                        ),
                    ));
                }
            }
            for (teacher, n) in per_teacher {
                if n > config.teacher_daily_limit {
                    violations.push(Violation::new(
                        ViolationType::TeacherDailyLoadExceeded,
                        id,
                        None,
                        format!(
                            "teacher '{teacher}' gives {n} lessons on {day_label}, limit {}",
                            config.teacher_daily_limit
                        ),
                    ));
                }
            }
        }

        for (slot, lesson) in schedule.lessons() {
            let Some(teacher) = lesson.teacher.as_deref() else {
                continue;
            };
            if let Some(other) = bookings.insert((slot, teacher), id) {
                violations.push(Violation::new(
                    ViolationType::TeacherDoubleBooked,
                    id,
                    Some(slot),
                    format!("teacher '{teacher}' already teaches class '{other}' at {slot}"),
                ));
            }
        }

        let Some(class) = classes.iter().find(|c| c.id == outcome.class_id) else {
            continue;
        };
        if !outcome.is_scheduled() {
            violations.push(Violation::new(
                ViolationType::MissingLessons,
                id,
                None,
                format!("no schedule found for {} lessons", class.required_lessons()),
            ));
            continue;
        }

        let placed = schedule.subject_counts();
        let mut fixed: BTreeMap<Slot, &str> = BTreeMap::new();
        for f in &class.fixed_slots {
            if let Some(slot) = grid.slot(&f.day, &f.period) {
                fixed.insert(slot, f.subject.as_str());
            }
        }
        let mut expected: BTreeMap<&str, usize> = BTreeMap::new();
        for req in &class.requirements {
            *expected.entry(req.subject.as_str()).or_insert(0) += req.count as usize;
        }
        for subject in fixed.values() {
            *expected.entry(subject).or_insert(0) += 1;
        }
        for (subject, want) in expected {
            let have = placed.get(subject).copied().unwrap_or(0);
            if have < want {
                violations.push(Violation::new(
                    ViolationType::MissingLessons,
                    id,
                    None,
                    format!("{have} of {want} lessons of '{subject}' placed"),
                ));
            }
        }
    }

    violations
}
