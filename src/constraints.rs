//! Hard placement constraints.
//!
//! A candidate placement (slot, subject, teacher) is accepted only when all
//! of the following hold, checked in this order:
//!
//! | # | Rule | Scope |
//! |---|------|-------|
//! | 1 | Slot is free | class |
//! | 2 | Lessons on the day `< class_daily_limit` | class |
//! | 3 | Lessons of the subject on the day `< max_same_subject_per_day` | class |
//! | 4 | Teacher not committed at the slot | all classes |
//! | 5 | Lessons of the teacher on the day `< teacher_daily_limit` | class |
//!
//! Rules 4 and 5 are skipped for lessons without a teacher.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SolverConfig;
use crate::models::{ClassSchedule, OccupancyIndex, Slot};

/// The first rule a refused placement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The class already has a lesson in the slot.
    SlotOccupied,
    /// The class reached its daily lesson limit.
    ClassDailyLimit,
    /// The subject reached its daily cap for this class.
    SubjectDailyCap,
    /// The teacher is committed elsewhere at this slot.
    TeacherBusy,
    /// The teacher reached the daily load for this class.
    TeacherDailyLoad,
}

impl Rejection {
    /// All rules in evaluation order.
    pub const ALL: [Rejection; 5] = [
        Rejection::SlotOccupied,
        Rejection::ClassDailyLimit,
        Rejection::SubjectDailyCap,
        Rejection::TeacherBusy,
        Rejection::TeacherDailyLoad,
    ];

    /// Position in [`Rejection::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rejection::SlotOccupied => "slot occupied",
            Rejection::ClassDailyLimit => "class daily limit",
            Rejection::SubjectDailyCap => "subject daily cap",
            Rejection::TeacherBusy => "teacher busy",
            Rejection::TeacherDailyLoad => "teacher daily load",
        };
        f.write_str(name)
    }
}

/// Rule 1.
#[inline]
pub fn slot_is_free(schedule: &ClassSchedule, slot: Slot) -> bool {
    !schedule.is_occupied(slot)
}

/// Rule 2.
#[inline]
pub fn within_class_daily_limit(schedule: &ClassSchedule, day: u8, config: &SolverConfig) -> bool {
    schedule.count_on(day) < config.class_daily_limit
}

/// Rule 3.
#[inline]
pub fn within_subject_daily_cap(
    schedule: &ClassSchedule,
    day: u8,
    subject: &str,
    config: &SolverConfig,
) -> bool {
    schedule.count_subject_on(day, subject) < config.max_same_subject_per_day
}

/// Rule 4. Always true for `teacher == None`.
#[inline]
pub fn teacher_is_free(occupancy: &OccupancyIndex, slot: Slot, teacher: Option<&str>) -> bool {
    teacher.is_none_or(|t| !occupancy.is_committed(slot, t))
}

/// Rule 5. Always true for `teacher == None`.
#[inline]
pub fn within_teacher_daily_load(
    schedule: &ClassSchedule,
    day: u8,
    teacher: Option<&str>,
    config: &SolverConfig,
) -> bool {
    teacher.is_none_or(|t| schedule.count_teacher_on(day, t) < config.teacher_daily_limit)
}

/// Evaluates all rules in order and returns the first that fails.
///
/// # Example
/// ```
/// use u_timetable::config::SolverConfig;
/// use u_timetable::constraints::{check_placement, Rejection};
/// use u_timetable::models::{ClassSchedule, OccupancyIndex, Slot, SlotGrid};
///
/// let grid = SlotGrid::default();
/// let schedule = ClassSchedule::new(&grid);
/// let mut occupancy = OccupancyIndex::new();
/// occupancy.commit(Slot::new(0, 0), "ivanova");
///
/// let config = SolverConfig::default();
/// let refused = check_placement(&schedule, &occupancy, Slot::new(0, 0), "math", Some("ivanova"), &config);
/// assert_eq!(refused, Err(Rejection::TeacherBusy));
/// assert!(check_placement(&schedule, &occupancy, Slot::new(0, 1), "math", Some("ivanova"), &config).is_ok());
/// ```
pub fn check_placement(
    schedule: &ClassSchedule,
    occupancy: &OccupancyIndex,
    slot: Slot,
    subject: &str,
    teacher: Option<&str>,
    config: &SolverConfig,
) -> Result<(), Rejection> {
    if !slot_is_free(schedule, slot) {
        return Err(Rejection::SlotOccupied);
    }
    if !within_class_daily_limit(schedule, slot.day, config) {
        return Err(Rejection::ClassDailyLimit);
    }
    if !within_subject_daily_cap(schedule, slot.day, subject, config) {
        return Err(Rejection::SubjectDailyCap);
    }
    if !teacher_is_free(occupancy, slot, teacher) {
        return Err(Rejection::TeacherBusy);
    }
    if !within_teacher_daily_load(schedule, slot.day, teacher, config) {
        return Err(Rejection::TeacherDailyLoad);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lesson, SlotGrid};

    fn grid() -> SlotGrid {
        SlotGrid::with_numbered_periods(["mon", "tue"], 4).unwrap()
    }

    #[test]
    fn test_free_slot_accepts() {
        let schedule = ClassSchedule::new(&grid());
        let occupancy = OccupancyIndex::new();
        let config = SolverConfig::default();
        assert!(check_placement(&schedule, &occupancy, Slot::new(0, 0), "math", Some("a"), &config).is_ok());
        assert!(check_placement(&schedule, &occupancy, Slot::new(1, 3), "art", None, &config).is_ok());
    }

    #[test]
    fn test_slot_occupied() {
        let mut schedule = ClassSchedule::new(&grid());
        schedule.insert(Slot::new(0, 0), Lesson::unassigned("art"));
        let config = SolverConfig::default();
        assert_eq!(
            check_placement(&schedule, &OccupancyIndex::new(), Slot::new(0, 0), "math", None, &config),
            Err(Rejection::SlotOccupied)
        );
    }

    #[test]
    fn test_class_daily_limit() {
        let mut schedule = ClassSchedule::new(&grid());
        schedule.insert(Slot::new(0, 0), Lesson::unassigned("art"));
        schedule.insert(Slot::new(0, 1), Lesson::unassigned("music"));
        let config = SolverConfig::default().with_class_daily_limit(2);
        assert_eq!(
            check_placement(&schedule, &OccupancyIndex::new(), Slot::new(0, 2), "math", None, &config),
            Err(Rejection::ClassDailyLimit)
        );
        assert!(check_placement(&schedule, &OccupancyIndex::new(), Slot::new(1, 0), "math", None, &config).is_ok());
    }

    #[test]
    fn test_subject_daily_cap() {
        let mut schedule = ClassSchedule::new(&grid());
        schedule.insert(Slot::new(0, 0), Lesson::unassigned("math"));
        schedule.insert(Slot::new(0, 1), Lesson::unassigned("math"));
        let config = SolverConfig::default();
        assert_eq!(
            check_placement(&schedule, &OccupancyIndex::new(), Slot::new(0, 2), "math", None, &config),
            Err(Rejection::SubjectDailyCap)
        );
        assert!(within_subject_daily_cap(&schedule, 0, "art", &config));
    }

    #[test]
    fn test_teacher_busy_only_when_assigned() {
        let schedule = ClassSchedule::new(&grid());
        let mut occupancy = OccupancyIndex::new();
        occupancy.commit(Slot::new(1, 1), "a");
        let config = SolverConfig::default();
        assert_eq!(
            check_placement(&schedule, &occupancy, Slot::new(1, 1), "math", Some("a"), &config),
            Err(Rejection::TeacherBusy)
        );
        assert!(check_placement(&schedule, &occupancy, Slot::new(1, 1), "math", Some("b"), &config).is_ok());
        assert!(check_placement(&schedule, &occupancy, Slot::new(1, 1), "math", None, &config).is_ok());
    }

    #[test]
    fn test_teacher_daily_load() {
        let mut schedule = ClassSchedule::new(&grid());
        schedule.insert(Slot::new(0, 0), Lesson::assigned("math", "a"));
        let config = SolverConfig::default().with_teacher_daily_limit(1);
        assert_eq!(
            check_placement(&schedule, &OccupancyIndex::new(), Slot::new(0, 1), "physics", Some("a"), &config),
            Err(Rejection::TeacherDailyLoad)
        );
        assert!(within_teacher_daily_load(&schedule, 0, None, &config));
        assert!(within_teacher_daily_load(&schedule, 1, Some("a"), &config));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut schedule = ClassSchedule::new(&grid());
        schedule.insert(Slot::new(0, 0), Lesson::assigned("math", "a"));
        schedule.insert(Slot::new(0, 1), Lesson::assigned("math", "a"));
        let mut occupancy = OccupancyIndex::new();
        occupancy.commit(Slot::new(0, 2), "a");
        let config = SolverConfig::default()
            .with_teacher_daily_limit(1)
            .with_class_daily_limit(2);
        // Rules 2 through 5 all fail; rule 2 is reported.
        assert_eq!(
            check_placement(&schedule, &occupancy, Slot::new(0, 2), "math", Some("a"), &config),
            Err(Rejection::ClassDailyLimit)
        );
    }

    #[test]
    fn test_rejection_index_matches_order() {
        for (i, rule) in Rejection::ALL.iter().enumerate() {
            assert_eq!(rule.index(), i);
        }
        assert_eq!(Rejection::TeacherBusy.to_string(), "teacher busy");
    }
}
