//! Teacher idle-gap scoring.
//!
//! For each day and each teacher teaching that day, the periods taught are
//! sorted and every hole between consecutive lessons is counted. A teacher
//! teaching periods 1, 2 and 5 has a gap of 2. Lessons without a teacher
//! are ignored. Lower scores are better.

use std::collections::BTreeMap;

use crate::models::ClassSchedule;

/// Idle periods per teacher, summed over all days.
///
/// Teachers without gaps still appear with a value of 0.
pub fn teacher_gaps(schedule: &ClassSchedule) -> BTreeMap<String, u32> {
    let mut gaps: BTreeMap<String, u32> = BTreeMap::new();
    for day in 0..schedule.day_count() as u8 {
        let mut periods: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
        for (slot, lesson) in schedule.lessons_on(day) {
            if let Some(teacher) = lesson.teacher.as_deref() {
                periods.entry(teacher).or_default().push(slot.period);
            }
        }
        for (teacher, mut taught) in periods {
            taught.sort_unstable();
            let idle: u32 = taught
                .windows(2)
                .map(|w| u32::from(w[1] - w[0]).saturating_sub(1))
                .sum();
            *gaps.entry(teacher.to_string()).or_default() += idle;
        }
    }
    gaps
}

/// Total gap score of a schedule.
///
/// # Example
/// ```
/// use u_timetable::gaps::gap_score;
/// use u_timetable::models::{ClassSchedule, Lesson, Slot, SlotGrid};
///
/// let grid = SlotGrid::default();
/// let mut schedule = ClassSchedule::new(&grid);
/// schedule.insert(Slot::new(0, 0), Lesson::assigned("math", "ivanova"));
/// schedule.insert(Slot::new(0, 3), Lesson::assigned("math", "ivanova"));
/// assert_eq!(gap_score(&schedule), 2);
/// ```
pub fn gap_score(schedule: &ClassSchedule) -> u32 {
    let mut total = 0u32;
    let mut taught: Vec<(&str, u8)> = Vec::new();
    for day in 0..schedule.day_count() as u8 {
        taught.clear();
        taught.extend(schedule.lessons_on(day).filter_map(|(slot, lesson)| {
            lesson.teacher.as_deref().map(|teacher| (teacher, slot.period))
        }));
        taught.sort_unstable();
        total += taught
            .windows(2)
            .filter(|w| w[0].0 == w[1].0)
            .map(|w| u32::from(w[1].1 - w[0].1) - 1)
            .sum::<u32>();
    }
    total
}
