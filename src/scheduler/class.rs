//! Single-class solver.
//!
//! # Algorithm
//!
//! 1. Expand each requirement `subject:count` into `count` lesson entries.
//! 2. Stable-sort entries by the number of qualified teachers, scarcest
//!    subject first, so the most constrained lessons are placed earliest.
//! 3. Map each subject to the first qualified teacher in roster order.
//! 4. Seed the schedule with the class's fixed slots and commit their
//!    teachers to the occupancy index.
//! 5. Run [`BacktrackingSearch`] and return its outcome unchanged.

use std::collections::BTreeMap;

use crate::config::SolverConfig;
use crate::error::TimetableError;
use crate::models::{
    first_qualified, qualified_count, ClassRecord, ClassSchedule, Lesson, OccupancyIndex, Slot,
    SlotGrid, Teacher,
};
use crate::search::{BacktrackingSearch, SearchInput, SearchOutcome, TeacherMap};
use crate::text::SubjectRequirement;

/// Lesson entries in search order: one per required lesson, scarcest
/// subject first. Subjects with equal scarcity keep their input order.
pub fn expand_subjects(requirements: &[SubjectRequirement], teachers: &[Teacher]) -> Vec<String> {
    let mut entries: Vec<(usize, &str)> = requirements
        .iter()
        .flat_map(|req| {
            let scarcity = qualified_count(teachers, &req.subject);
            std::iter::repeat_n((scarcity, req.subject.as_str()), req.count as usize)
        })
        .collect();
    entries.sort_by_key(|(scarcity, _)| *scarcity);
    entries.into_iter().map(|(_, s)| s.to_string()).collect()
}

/// First qualified teacher of every required subject, or `None`.
pub fn build_teacher_map(requirements: &[SubjectRequirement], teachers: &[Teacher]) -> TeacherMap {
    requirements
        .iter()
        .map(|req| {
            let teacher = first_qualified(teachers, &req.subject).map(|t| t.id.clone());
            (req.subject.clone(), teacher)
        })
        .collect()
}

/// Builds the initial schedule from the class's fixed slots.
///
/// All labels are resolved before `occupancy` is touched, so an unknown
/// label leaves it unchanged. A repeated (day, period) keeps the last
/// lesson and releases the teacher of the one it replaces.
pub fn seed_fixed_slots(
    class: &ClassRecord,
    grid: &SlotGrid,
    occupancy: &mut OccupancyIndex,
) -> Result<ClassSchedule, TimetableError> {
    let mut resolved: Vec<(Slot, Lesson)> = Vec::with_capacity(class.fixed_slots.len());
    for fixed in &class.fixed_slots {
        let day = grid
            .day_position(&fixed.day)
            .ok_or_else(|| TimetableError::UnknownDay {
                class_id: class.id.clone(),
                label: fixed.day.clone(),
            })?;
        let period = grid
            .period_position(&fixed.period)
            .ok_or_else(|| TimetableError::UnknownPeriod {
                class_id: class.id.clone(),
                label: fixed.period.clone(),
            })?;
        let lesson = Lesson::new(fixed.subject.clone(), fixed.teacher_id());
        resolved.push((Slot::new(day, period), lesson));
    }

    let mut schedule = ClassSchedule::new(grid);
    // slots whose teacher this class committed itself
    let mut owned: BTreeMap<Slot, bool> = BTreeMap::new();

    for (slot, lesson) in resolved {
        if let Some(previous) = schedule.remove(slot) {
            tracing::warn!(
                class = %class.id,
                %slot,
                replaced = %previous.subject,
                subject = %lesson.subject,
                "duplicate fixed slot, keeping the last one"
            );
            if let (Some(teacher), Some(&true)) = (previous.teacher.as_deref(), owned.get(&slot)) {
                occupancy.release(slot, teacher);
            }
        }

        let committed = match lesson.teacher.as_deref() {
            Some(teacher) => {
                if occupancy.is_committed(slot, teacher) {
                    tracing::warn!(
                        class = %class.id,
                        %slot,
                        teacher,
                        "fixed lesson teacher already committed by another class"
                    );
                }
                occupancy.commit(slot, teacher)
            }
            None => false,
        };
        owned.insert(slot, committed);
        schedule.insert(slot, lesson);
    }

    Ok(schedule)
}

/// Solves one class against a shared occupancy index.
///
/// # Example
/// ```
/// use u_timetable::models::{ClassRecord, OccupancyIndex, Teacher};
/// use u_timetable::scheduler::ClassSolver;
///
/// let class = ClassRecord::from_text("5a", "math:2, art").unwrap();
/// let teachers = vec![
///     Teacher::new("ivanova").with_specialization("math"),
///     Teacher::new("petrov").with_specialization("art"),
/// ];
/// let mut occupancy = OccupancyIndex::new();
///
/// let outcome = ClassSolver::new().solve(&class, &teachers, &mut occupancy).unwrap();
/// assert_eq!(outcome.schedule.unwrap().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassSolver {
    config: SolverConfig,
    grid: SlotGrid,
}

impl ClassSolver {
    /// Creates a solver with default limits on the default grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the slot grid.
    pub fn with_grid(mut self, grid: SlotGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Slot grid in use.
    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Schedules `class`.
    ///
    /// Fixed-slot teachers stay committed in `occupancy` afterwards; lessons
    /// placed by the search do not. Committing the returned schedule is up
    /// to the caller.
    pub fn solve(
        &self,
        class: &ClassRecord,
        teachers: &[Teacher],
        occupancy: &mut OccupancyIndex,
    ) -> Result<SearchOutcome, TimetableError> {
        self.config.validate()?;

        let subjects = expand_subjects(&class.requirements, teachers);
        let teacher_map = build_teacher_map(&class.requirements, teachers);
        for (subject, teacher) in &teacher_map {
            if teacher.is_none() {
                tracing::debug!(class = %class.id, subject = %subject, "no qualified teacher, lessons stay unassigned");
            }
        }

        let initial = seed_fixed_slots(class, &self.grid, occupancy)?;
        tracing::debug!(
            class = %class.id,
            lessons = subjects.len(),
            fixed = initial.len(),
            "solving class"
        );

        let input = SearchInput::new(&self.grid, &subjects, &teacher_map).with_initial(initial);
        let outcome = BacktrackingSearch::new(self.config.clone()).search(input, occupancy);

        tracing::debug!(
            class = %class.id,
            found = outcome.is_found(),
            score = outcome.score,
            termination = ?outcome.termination,
            "class solved"
        );
        Ok(outcome)
    }
}
