//! Timetable quality metrics (KPIs).
//!
//! Computes summary indicators from a finished timetable and its input
//! classes.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled classes | Classes with a complete schedule |
//! | Placement rate | Placed required lessons / required lessons |
//! | Unassigned lessons | Placed lessons without a teacher |
//! | Total gap score | Sum of per-class gap scores |
//! | School-wide teacher gaps | Idle periods per teacher across all classes |
//! | Teacher load | Lessons per teacher per week |
//! | Lessons by class | Placed lessons per class and subject |

use serde::Serialize;
use std::collections::BTreeMap;

use super::Timetable;
use crate::models::ClassRecord;

/// Timetable performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableKpi {
    /// Classes with a complete schedule.
    pub scheduled_classes: usize,
    /// Classes without a schedule.
    pub unscheduled_classes: usize,
    /// Required lessons over all classes.
    pub required_lessons: usize,
    /// Required lessons actually placed (fixed lessons excluded).
    pub placed_lessons: usize,
    /// `placed_lessons / required_lessons` (1.0 when nothing is required).
    pub placement_rate: f64,
    /// Placed lessons with no teacher.
    pub unassigned_lessons: usize,
    /// Sum of per-class gap scores.
    pub total_gap_score: u32,
    /// Idle periods per teacher with all classes merged.
    pub teacher_gaps: BTreeMap<String, u32>,
    /// Weekly lesson count per teacher.
    pub teacher_load: BTreeMap<String, usize>,
    /// Placed lessons per class and subject, fixed lessons included.
    pub lessons_by_class: BTreeMap<String, BTreeMap<String, usize>>,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable and its input classes.
    pub fn calculate(timetable: &Timetable, classes: &[ClassRecord]) -> Self {
        let mut required_lessons = 0;
        let mut placed_lessons = 0;

        for class in classes {
            required_lessons += class.required_lessons();
            let Some(outcome) = timetable.outcome(&class.id) else {
                continue;
            };
            if outcome.is_scheduled() {
                placed_lessons += class.required_lessons();
            }
        }

        let mut unassigned_lessons = 0;
        let mut teacher_load: BTreeMap<String, usize> = BTreeMap::new();
        // (teacher, day) -> periods taught in any class
        let mut taught: BTreeMap<(&str, u8), Vec<u8>> = BTreeMap::new();
        for outcome in timetable.outcomes() {
            for (slot, lesson) in outcome.schedule.lessons() {
                match lesson.teacher.as_deref() {
                    Some(teacher) => {
                        *teacher_load.entry(teacher.to_string()).or_insert(0) += 1;
                        taught.entry((teacher, slot.day)).or_default().push(slot.period);
                    }
                    None => unassigned_lessons += 1,
                }
            }
        }

        let lessons_by_class = timetable
            .outcomes()
            .iter()
            .map(|o| (o.class_id.clone(), o.schedule.subject_counts()))
            .collect();

        let mut teacher_gaps: BTreeMap<String, u32> = BTreeMap::new();
        for ((teacher, _), mut periods) in taught {
            periods.sort_unstable();
            periods.dedup();
            let idle: u32 = periods
                .windows(2)
                .map(|w| u32::from(w[1] - w[0]) - 1)
                .sum();
            *teacher_gaps.entry(teacher.to_string()).or_insert(0) += idle;
        }

        let scheduled_classes = timetable.outcomes().iter().filter(|o| o.is_scheduled()).count();
        let placement_rate = if required_lessons == 0 {
            1.0
        } else {
            placed_lessons as f64 / required_lessons as f64
        };

        Self {
            scheduled_classes,
            unscheduled_classes: timetable.outcomes().len() - scheduled_classes,
            required_lessons,
            placed_lessons,
            placement_rate,
            unassigned_lessons,
            total_gap_score: timetable.total_gap_score(),
            teacher_gaps,
            teacher_load,
            lessons_by_class,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, max_gap_score: u32) -> bool {
        self.placement_rate >= min_placement_rate && self.total_gap_score <= max_gap_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotGrid, Teacher};
    use crate::scheduler::TimetableScheduler;

    #[test]
    fn test_kpi_complete_timetable() {
        let classes = vec![
            ClassRecord::from_text("5a", "math:2, art").unwrap(),
            ClassRecord::from_text("5b", "math").unwrap(),
        ];
        let teachers = vec![Teacher::new("ivanova").with_specialization("math")];
        let timetable = TimetableScheduler::new().schedule(&classes, &teachers).unwrap();

        let kpi = TimetableKpi::calculate(&timetable, &classes);
        assert_eq!(kpi.scheduled_classes, 2);
        assert_eq!(kpi.unscheduled_classes, 0);
        assert_eq!(kpi.required_lessons, 4);
        assert_eq!(kpi.placed_lessons, 4);
        assert!((kpi.placement_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.unassigned_lessons, 1);
        assert_eq!(kpi.teacher_load["ivanova"], 3);
        assert_eq!(kpi.lessons_by_class["5a"]["math"], 2);
        assert_eq!(kpi.lessons_by_class["5b"]["math"], 1);
        assert!(kpi.meets_thresholds(1.0, kpi.total_gap_score));
    }

    #[test]
    fn test_kpi_partial_timetable() {
        let grid = SlotGrid::with_numbered_periods(["mon"], 1).unwrap();
        let classes = vec![
            ClassRecord::from_text("5a", "math").unwrap(),
            ClassRecord::from_text("5b", "math").unwrap(),
        ];
        let teachers = vec![Teacher::new("ivanova").with_specialization("math")];
        let timetable = TimetableScheduler::new()
            .with_grid(grid)
            .schedule(&classes, &teachers)
            .unwrap();

        let kpi = TimetableKpi::calculate(&timetable, &classes);
        assert_eq!(kpi.scheduled_classes, 1);
        assert_eq!(kpi.unscheduled_classes, 1);
        assert!((kpi.placement_rate - 0.5).abs() < 1e-10);
        assert!(!kpi.meets_thresholds(1.0, 0));
    }

    #[test]
    fn test_school_wide_gaps_merge_classes() {
        // ivanova teaches 5a at period 1 and 5b at period 3 of the same day
        let grid = SlotGrid::with_numbered_periods(["mon"], 3).unwrap();
        let classes = vec![
            ClassRecord::new("5a").with_fixed_slot(
                crate::models::FixedSlot::new("mon", "1", "math").with_teacher("ivanova"),
            ),
            ClassRecord::new("5b").with_fixed_slot(
                crate::models::FixedSlot::new("mon", "3", "math").with_teacher("ivanova"),
            ),
        ];
        let timetable = TimetableScheduler::new()
            .with_grid(grid)
            .schedule(&classes, &[])
            .unwrap();

        let kpi = TimetableKpi::calculate(&timetable, &classes);
        assert_eq!(kpi.total_gap_score, 0);
        assert_eq!(kpi.teacher_gaps["ivanova"], 1);
        assert!((kpi.placement_rate - 1.0).abs() < 1e-10);
    }
}
