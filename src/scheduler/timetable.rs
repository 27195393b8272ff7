//! Whole-school timetabling.
//!
//! # Algorithm
//!
//! 1. Validate the input (ids, fixed-slot labels, configuration).
//! 2. Solve classes one at a time in input order with [`ClassSolver`].
//! 3. After each class, commit the teachers of its schedule to the shared
//!    occupancy index so later classes avoid them.
//!
//! Classes are never revisited: an early class can take the only free slot
//! of a shared teacher and leave a later class infeasible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ClassSolver;
use crate::config::SolverConfig;
use crate::error::TimetableError;
use crate::models::{ClassRecord, ClassSchedule, Lesson, OccupancyIndex, SlotGrid, Teacher};
use crate::search::{SearchStatistics, Termination};
use crate::validation::validate_input;

/// Input container for timetabling, deserializable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRequest {
    /// Classes in scheduling order.
    pub classes: Vec<ClassRecord>,
    /// Teacher roster.
    pub teachers: Vec<Teacher>,
    /// Solver limits.
    #[serde(default)]
    pub config: SolverConfig,
    /// Slot grid of the week.
    #[serde(default)]
    pub grid: SlotGrid,
}

impl TimetableRequest {
    /// Creates a request with default limits and grid.
    pub fn new(classes: Vec<ClassRecord>, teachers: Vec<Teacher>) -> Self {
        Self {
            classes,
            teachers,
            config: SolverConfig::default(),
            grid: SlotGrid::default(),
        }
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
}

/// Result for one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassOutcome {
    /// Class identifier.
    pub class_id: String,
    /// Found schedule; empty when none was found. Serialized through
    /// [`Timetable`] as labelled day → period → lesson maps.
    #[serde(skip_serializing)]
    pub schedule: ClassSchedule,
    /// Gap score of `schedule`; `None` when none was found.
    pub gap_score: Option<u32>,
    /// Why the class search stopped.
    pub termination: Termination,
    /// Class search counters.
    pub stats: SearchStatistics,
}

impl ClassOutcome {
    /// Whether a complete schedule was found.
    pub fn is_scheduled(&self) -> bool {
        self.gap_score.is_some()
    }
}

/// Schedules of all classes, in input order.
///
/// Serializes as `{grid, schedules, outcomes}` where `schedules` is the
/// [`Timetable::schedules`] export.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "TimetableExport")]
pub struct Timetable {
    grid: SlotGrid,
    outcomes: Vec<ClassOutcome>,
}

/// Class id → day label → period label → lesson.
pub type NamedSchedules = BTreeMap<String, BTreeMap<String, BTreeMap<String, Lesson>>>;

#[derive(Serialize)]
struct TimetableExport {
    grid: SlotGrid,
    schedules: NamedSchedules,
    outcomes: Vec<ClassOutcome>,
}

impl From<Timetable> for TimetableExport {
    fn from(timetable: Timetable) -> Self {
        Self {
            schedules: timetable.schedules(),
            grid: timetable.grid,
            outcomes: timetable.outcomes,
        }
    }
}

impl Timetable {
    /// Slot grid the schedules were built on.
    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Per-class outcomes in input order.
    pub fn outcomes(&self) -> &[ClassOutcome] {
        &self.outcomes
    }

    /// Outcome of one class.
    pub fn outcome(&self, class_id: &str) -> Option<&ClassOutcome> {
        let class_id = crate::text::normalize_text(class_id);
        self.outcomes.iter().find(|o| o.class_id == class_id)
    }

    /// Schedule of one class.
    pub fn schedule(&self, class_id: &str) -> Option<&ClassSchedule> {
        self.outcome(class_id).map(|o| &o.schedule)
    }

    /// Whether every class got a complete schedule.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(ClassOutcome::is_scheduled)
    }

    /// Classes without a schedule.
    pub fn unscheduled(&self) -> impl Iterator<Item = &str> + '_ {
        self.outcomes
            .iter()
            .filter(|o| !o.is_scheduled())
            .map(|o| o.class_id.as_str())
    }

    /// Sum of gap scores of all scheduled classes.
    pub fn total_gap_score(&self) -> u32 {
        self.outcomes.iter().filter_map(|o| o.gap_score).sum()
    }

    /// Number of placed lessons per class.
    pub fn lesson_counts(&self) -> BTreeMap<String, usize> {
        self.outcomes
            .iter()
            .map(|o| (o.class_id.clone(), o.schedule.len()))
            .collect()
    }

    /// Exports as class id → day label → period label → lesson.
    pub fn schedules(&self) -> NamedSchedules {
        self.outcomes
            .iter()
            .map(|o| (o.class_id.clone(), o.schedule.to_named(&self.grid)))
            .collect()
    }
}

/// Timetables classes one after another against a shared occupancy index.
///
/// # Example
///
/// ```
/// use u_timetable::models::{ClassRecord, Teacher};
/// use u_timetable::scheduler::TimetableScheduler;
///
/// let classes = vec![
///     ClassRecord::from_text("5a", "math:2, physics").unwrap(),
///     ClassRecord::from_text("5b", "math:2").unwrap(),
/// ];
/// let teachers = vec![Teacher::new("ivanova").with_specialization("math, physics")];
///
/// let timetable = TimetableScheduler::new().schedule(&classes, &teachers).unwrap();
/// assert!(timetable.is_complete());
/// assert_eq!(timetable.lesson_counts()["5a"], 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableScheduler {
    config: SolverConfig,
    grid: SlotGrid,
}

impl TimetableScheduler {
    /// Creates a scheduler with default limits on the default grid.
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

    /// Schedules all classes from scratch.
    pub fn schedule(
        &self,
        classes: &[ClassRecord],
        teachers: &[Teacher],
    ) -> Result<Timetable, TimetableError> {
        let mut occupancy = OccupancyIndex::new();
        self.schedule_with_occupancy(classes, teachers, &mut occupancy)
    }

    /// Schedules all classes around teachers already committed in
    /// `occupancy`. On success `occupancy` also holds every new lesson.
    pub fn schedule_with_occupancy(
        &self,
        classes: &[ClassRecord],
        teachers: &[Teacher],
        occupancy: &mut OccupancyIndex,
    ) -> Result<Timetable, TimetableError> {
        self.config.validate()?;
        validate_input(classes, teachers, &self.grid)?;

        let solver = ClassSolver::new()
            .with_config(self.config.clone())
            .with_grid(self.grid.clone());
        let mut outcomes = Vec::with_capacity(classes.len());

        for class in classes {
            let result = solver.solve(class, teachers, occupancy)?;
            let schedule = match result.schedule {
                Some(schedule) => {
                    occupancy.commit_schedule(&schedule);
                    schedule
                }
                None => ClassSchedule::new(&self.grid),
            };

            tracing::info!(
                class = %class.id,
                lessons = schedule.len(),
                gap_score = result.score,
                termination = ?result.termination,
                "class scheduled"
            );

            outcomes.push(ClassOutcome {
                class_id: class.id.clone(),
                schedule,
                gap_score: result.score,
                termination: result.termination,
                stats: result.stats,
            });
        }

        Ok(Timetable {
            grid: self.grid.clone(),
            outcomes,
        })
    }

    /// Schedules from a request, using its configuration and grid.
    pub fn schedule_request(request: &TimetableRequest) -> Result<Timetable, TimetableError> {
        Self::new()
            .with_config(request.config.clone())
            .with_grid(request.grid.clone())
            .schedule(&request.classes, &request.teachers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedSlot, Slot};
    use crate::validation::audit_timetable;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small_grid() -> SlotGrid {
        SlotGrid::with_numbered_periods(["mon", "tue"], 3).unwrap()
    }

    #[test]
    fn test_contested_teacher_goes_to_first_class() {
        // one teacher, one day, one period: only the first class can have it
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

        let first = timetable.outcome("5a").unwrap();
        assert!(first.is_scheduled());
        assert_eq!(
            first.schedule.get(Slot::new(0, 0)),
            Some(&Lesson::assigned("math", "ivanova"))
        );

        let second = timetable.outcome("5b").unwrap();
        assert!(!second.is_scheduled());
        assert!(second.schedule.is_empty());
        assert_eq!(second.termination, Termination::Exhausted);
        assert_eq!(timetable.unscheduled().collect::<Vec<_>>(), vec!["5b"]);
    }

    #[test]
    fn test_later_class_avoids_committed_teacher() {
        let classes = vec![
            ClassRecord::from_text("5a", "math:2").unwrap(),
            ClassRecord::from_text("5b", "math:2").unwrap(),
        ];
        let teachers = vec![Teacher::new("ivanova").with_specialization("math")];
        let mut occupancy = OccupancyIndex::new();

        let timetable = TimetableScheduler::new()
            .with_grid(small_grid())
            .schedule_with_occupancy(&classes, &teachers, &mut occupancy)
            .unwrap();

        assert!(timetable.is_complete());
        let a = timetable.schedule("5a").unwrap();
        let b = timetable.schedule("5b").unwrap();
        for (slot, _) in a.lessons() {
            assert!(!b.is_occupied(slot));
        }
        assert_eq!(occupancy.commitment_count(), 4);
    }

    #[test]
    fn test_pre_committed_teacher_respected() {
        let classes = vec![ClassRecord::from_text("5a", "math").unwrap()];
        let teachers = vec![Teacher::new("ivanova").with_specialization("math")];
        let mut occupancy = OccupancyIndex::new();
        occupancy.commit(Slot::new(0, 0), "ivanova");

        let timetable = TimetableScheduler::new()
            .with_grid(small_grid())
            .schedule_with_occupancy(&classes, &teachers, &mut occupancy)
            .unwrap();
        let schedule = timetable.schedule("5a").unwrap();
        assert!(!schedule.is_occupied(Slot::new(0, 0)));
        assert!(schedule.is_occupied(Slot::new(0, 1)));
    }

    #[test]
    fn test_fixed_slots_survive_export() {
        let classes = vec![ClassRecord::from_text("5a", "math")
            .unwrap()
            .with_fixed_slot(FixedSlot::new("Monday", "1", "PE").with_teacher("sidorov"))];
        let teachers = vec![Teacher::new("ivanova").with_specialization("math")];

        let timetable = TimetableScheduler::new().schedule(&classes, &teachers).unwrap();
        let export = timetable.schedules();
        assert_eq!(
            export["5a"]["monday"]["1"],
            Lesson::assigned("pe", "sidorov")
        );
        assert_eq!(timetable.lesson_counts()["5a"], 2);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let classes = vec![
            ClassRecord::from_text("5a", "math").unwrap(),
            ClassRecord::from_text("5A", "art").unwrap(),
        ];
        let result = TimetableScheduler::new().schedule(&classes, &[]);
        assert!(matches!(result, Err(TimetableError::Invalid(_))));

        let result = TimetableScheduler::new()
            .with_config(SolverConfig::default().with_teacher_daily_limit(0))
            .schedule(&[], &[]);
        assert!(matches!(result, Err(TimetableError::Config(_))));
    }

    #[test]
    fn test_schedule_request_from_json() {
        let json = r#"{
            "classes": [
                {"id": "5a", "requirements": [{"subject": "math", "count": 2}]}
            ],
            "teachers": [
                {"id": "ivanova", "specialization": "math"}
            ],
            "config": {"max_same_subject_per_day": 1},
            "grid": {"days": ["mon", "tue"], "periods": ["1", "2"]}
        }"#;
        let request: TimetableRequest = serde_json::from_str(json).unwrap();
        let timetable = TimetableScheduler::schedule_request(&request).unwrap();

        let schedule = timetable.schedule("5a").unwrap();
        assert_eq!(schedule.count_on(0), 1);
        assert_eq!(schedule.count_on(1), 1);

        let value = serde_json::to_value(&timetable).unwrap();
        assert_eq!(value["outcomes"][0]["class_id"], "5a");
        assert!(value["outcomes"][0].get("schedule").is_none());
        let days = value["schedules"]["5a"].as_object().unwrap();
        assert_eq!(days.len(), 2);
        for periods in days.values() {
            let periods = periods.as_object().unwrap();
            assert_eq!(periods.len(), 1);
            let lesson = periods.values().next().unwrap();
            assert_eq!(lesson["subject"], "math");
            assert_eq!(lesson["teacher"], "ivanova");
        }
    }

    #[test]
    fn test_json_input_is_normalized() {
        // mixed-case ids everywhere; sidorov is fixed in 5A at mon 1 and must
        // not be booked there again for 5B
        let json = r#"{
            "classes": [
                {
                    "id": "5A",
                    "requirements": [{"subject": "Math", "count": 1}],
                    "fixed_slots": [
                        {"day": "Mon", "period": "1", "subject": "PE", "teacher": "Sidorov"}
                    ]
                },
                {"id": "5B", "requirements": [{"subject": "PE"}]}
            ],
            "teachers": [{"id": "Sidorov", "specialization": "PE, Math"}],
            "grid": {"days": ["Mon"], "periods": ["1", "2", "3"]}
        }"#;
        let request: TimetableRequest = serde_json::from_str(json).unwrap();
        let timetable = TimetableScheduler::schedule_request(&request).unwrap();
        assert!(timetable.is_complete());

        let a = timetable.outcome("5A").unwrap();
        assert_eq!(a.schedule.get(Slot::new(0, 0)), Some(&Lesson::assigned("pe", "sidorov")));
        assert_eq!(a.schedule.get(Slot::new(0, 1)), Some(&Lesson::assigned("math", "sidorov")));

        let b = timetable.schedule("5b").unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(Slot::new(0, 2)), Some(&Lesson::assigned("pe", "sidorov")));

        assert!(audit_timetable(&timetable, &request.classes, &request.config).is_empty());
        let kpi = crate::scheduler::TimetableKpi::calculate(&timetable, &request.classes);
        assert!((kpi.placement_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.teacher_load["sidorov"], 3);
    }

    #[test]
    fn test_empty_input() {
        let timetable = TimetableScheduler::new().schedule(&[], &[]).unwrap();
        assert!(timetable.is_complete());
        assert!(timetable.outcomes().is_empty());
        assert_eq!(timetable.total_gap_score(), 0);
    }

    #[test]
    fn test_random_instances_satisfy_hard_constraints() {
        let subjects = ["math", "physics", "art", "history", "pe"];
        let mut rng = StdRng::seed_from_u64(7);

        for round in 0..20 {
            let teachers: Vec<Teacher> = (0..rng.random_range(1..=4))
                .map(|t| {
                    let a = subjects[rng.random_range(0..subjects.len())];
                    let b = subjects[rng.random_range(0..subjects.len())];
                    Teacher::new(format!("t{t}")).with_specialization(format!("{a}, {b}"))
                })
                .collect();
            let classes: Vec<ClassRecord> = (0..rng.random_range(1..=3))
                .map(|c| {
                    let mut class = ClassRecord::new(format!("c{c}"));
                    for _ in 0..rng.random_range(1..=3) {
                        let subject = subjects[rng.random_range(0..subjects.len())];
                        class = class.with_subject(subject, rng.random_range(1..=2));
                    }
                    class
                })
                .collect();
            let config = SolverConfig::default()
                .with_class_daily_limit(rng.random_range(2..=3))
                .with_teacher_daily_limit(rng.random_range(1..=2))
                .with_search_deadline_seconds(2.0);

            let timetable = TimetableScheduler::new()
                .with_config(config.clone())
                .with_grid(small_grid())
                .schedule(&classes, &teachers)
                .unwrap();

            let violations = audit_timetable(&timetable, &classes, &config);
            let hard: Vec<_> = violations
                .iter()
                .filter(|v| v.violation_type != crate::models::ViolationType::MissingLessons)
                .collect();
            assert!(hard.is_empty(), "round {round}: {hard:?}");

            for outcome in timetable.outcomes() {
                if outcome.is_scheduled() {
                    let class = classes.iter().find(|c| c.id == outcome.class_id).unwrap();
                    assert_eq!(outcome.schedule.len(), class.required_lessons());
                }
            }
        }
    }
}
