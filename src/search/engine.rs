//! Depth-first backtracking over a class's lesson list.
//!
//! # Algorithm
//!
//! 1. Lesson `i` is tried in every free slot in canonical order (days outer,
//!    periods inner) that passes [`check_placement`].
//! 2. A complete schedule is scored with [`gap_score`]; a strictly lower
//!    score replaces the best schedule.
//! 3. Subtrees are memoized on (i, cell contents, used slots). The
//!    occupancy index is not part of the key: within one search it equals
//!    the pre-search index plus this class's own placements.
//! 4. The deadline is polled on every call. Reaching a zero-gap schedule
//!    also stops the search, since nothing can beat it.
//!
//! # Complexity
//! Worst case O(S^N) for S slots and N lessons; the memo and the scarcity
//! ordering of lessons keep real instances far below that.

use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::state::{MemoKey, Placement, SearchState};
use super::SearchStatistics;
use crate::config::SolverConfig;
use crate::constraints::check_placement;
use crate::gaps::gap_score;
use crate::models::{ClassSchedule, Lesson, OccupancyIndex, SlotGrid};

/// Subject → teacher chosen for it; `None` when nobody qualifies.
pub type TeacherMap = BTreeMap<String, Option<String>>;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Every branch was explored or answered from the memo.
    Exhausted,
    /// A schedule without teacher gaps was found.
    ZeroGapReached,
    /// The wall-clock budget ran out.
    DeadlineExceeded,
}

/// Input of one class search.
#[derive(Debug, Clone)]
pub struct SearchInput<'a> {
    /// Slot grid of the week.
    pub grid: &'a SlotGrid,
    /// Subjects to place, one entry per lesson, in search order.
    pub subjects: &'a [String],
    /// Teacher of each subject.
    pub teacher_map: &'a TeacherMap,
    /// Partial schedule to extend; its occupied cells are the used slots.
    pub initial: ClassSchedule,
}

impl<'a> SearchInput<'a> {
    /// Creates an input starting from an empty schedule.
    pub fn new(grid: &'a SlotGrid, subjects: &'a [String], teacher_map: &'a TeacherMap) -> Self {
        Self {
            grid,
            subjects,
            teacher_map,
            initial: ClassSchedule::new(grid),
        }
    }

    /// Starts from `schedule` instead of an empty one.
    ///
    /// # Panics
    /// Panics if `schedule` was not built for the same grid shape.
    pub fn with_initial(mut self, schedule: ClassSchedule) -> Self {
        assert!(
            schedule.day_count() == self.grid.day_count()
                && schedule.period_count() == self.grid.period_count(),
            "initial schedule does not match the slot grid"
        );
        self.initial = schedule;
        self
    }
}

/// Result of one class search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Best complete schedule, if any was found.
    pub schedule: Option<ClassSchedule>,
    /// Gap score of `schedule`.
    pub score: Option<u32>,
    /// Why the search stopped.
    pub termination: Termination,
    /// Search counters.
    pub stats: SearchStatistics,
}

impl SearchOutcome {
    /// Whether a complete schedule was found.
    pub fn is_found(&self) -> bool {
        self.schedule.is_some()
    }

    /// Whether the search proved that no complete schedule exists.
    pub fn is_infeasible(&self) -> bool {
        self.schedule.is_none() && self.termination == Termination::Exhausted
    }
}

/// Exhaustive depth-first search with memoization and a deadline.
///
/// # Example
/// ```
/// use u_timetable::config::SolverConfig;
/// use u_timetable::models::{OccupancyIndex, SlotGrid};
/// use u_timetable::search::{BacktrackingSearch, SearchInput, TeacherMap};
///
/// let grid = SlotGrid::with_numbered_periods(["mon", "tue"], 3).unwrap();
/// let subjects = vec!["math".to_string(), "math".to_string()];
/// let mut teachers = TeacherMap::new();
/// teachers.insert("math".into(), Some("ivanova".into()));
///
/// let mut occupancy = OccupancyIndex::new();
/// let outcome = BacktrackingSearch::new(SolverConfig::default())
///     .search(SearchInput::new(&grid, &subjects, &teachers), &mut occupancy);
///
/// assert_eq!(outcome.score, Some(0));
/// assert_eq!(outcome.schedule.unwrap().len(), 2);
/// assert!(occupancy.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackingSearch {
    config: SolverConfig,
    #[cfg(test)]
    node_limit: Option<u64>,
}

impl BacktrackingSearch {
    /// Creates a search with the given limits and deadline.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            #[cfg(test)]
            node_limit: None,
        }
    }

    /// Expires the deadline once more than `limit` nodes were explored.
    #[cfg(test)]
    fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Searches for the lowest-gap complete schedule.
    ///
    /// `occupancy` must already contain the teachers of `input.initial`
    /// and of every previously scheduled class. It is returned unchanged.
    pub fn search(&self, input: SearchInput<'_>, occupancy: &mut OccupancyIndex) -> SearchOutcome {
        let started = Instant::now();
        let grid = input.grid;

        let mut codes = LessonCodes::default();
        let entries: Vec<Entry> = input
            .subjects
            .iter()
            .map(|subject| {
                let teacher = input.teacher_map.get(subject).cloned().flatten();
                let lesson = Lesson::new(subject.clone(), teacher);
                let code = codes.intern(&lesson);
                Entry { lesson, code }
            })
            .collect();

        let mut used = FixedBitSet::with_capacity(grid.len());
        let mut cells = vec![0u32; grid.len()];
        for (slot, lesson) in input.initial.lessons() {
            let index = grid.index(slot);
            used.insert(index);
            cells[index] = codes.intern(lesson);
        }

        let mut state = SearchState::new(input.initial, used, cells, occupancy);
        let mut run = Run {
            config: &self.config,
            grid,
            entries: &entries,
            expires_at: started.checked_add(self.config.search_deadline()),
            memo: FxHashMap::default(),
            best: None,
            stats: SearchStatistics::default(),
            halt: None,
            #[cfg(test)]
            node_limit: self.node_limit,
        };

        let termination = match run.descend(&mut state, 0) {
            Descent::Halt => run.halt.unwrap_or(Termination::DeadlineExceeded),
            Descent::Score(_) => Termination::Exhausted,
        };
        drop(state);

        let mut stats = run.stats;
        stats.set_elapsed(started.elapsed());
        let (score, schedule) = match run.best {
            Some((score, schedule)) => (Some(score), Some(schedule)),
            None => (None, None),
        };

        if termination == Termination::DeadlineExceeded {
            tracing::warn!(
                lessons = entries.len(),
                found = schedule.is_some(),
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "search deadline exceeded, returning best schedule so far"
            );
        }
        tracing::debug!(
            ?termination,
            score,
            nodes = stats.nodes_explored,
            cache_hits = stats.cache_hits,
            solutions = stats.solutions_found,
            "search finished"
        );

        SearchOutcome {
            schedule,
            score,
            termination,
            stats,
        }
    }
}

struct Entry {
    lesson: Lesson,
    code: u32,
}

/// Interns distinct lessons as non-zero codes.
#[derive(Default)]
struct LessonCodes {
    codes: FxHashMap<Lesson, u32>,
}

impl LessonCodes {
    fn intern(&mut self, lesson: &Lesson) -> u32 {
        if let Some(&code) = self.codes.get(lesson) {
            return code;
        }
        let code = self.codes.len() as u32 + 1;
        self.codes.insert(lesson.clone(), code);
        code
    }
}

enum Descent {
    /// Best score below this node; `None` if no completion exists.
    Score(Option<u32>),
    /// Stop the whole search without caching.
    Halt,
}

struct Run<'a> {
    config: &'a SolverConfig,
    grid: &'a SlotGrid,
    entries: &'a [Entry],
    expires_at: Option<Instant>,
    memo: FxHashMap<MemoKey, Option<u32>>,
    best: Option<(u32, ClassSchedule)>,
    stats: SearchStatistics,
    halt: Option<Termination>,
    #[cfg(test)]
    node_limit: Option<u64>,
}

impl Run<'_> {
    #[inline]
    fn expired(&self) -> bool {
        self.over_node_limit() || self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    #[cfg(test)]
    fn over_node_limit(&self) -> bool {
        self.node_limit
            .is_some_and(|limit| self.stats.nodes_explored > limit)
    }

    #[cfg(not(test))]
    #[inline]
    fn over_node_limit(&self) -> bool {
        false
    }

    fn descend(&mut self, state: &mut SearchState<'_>, depth: usize) -> Descent {
        self.stats.on_node_explored();
        if self.expired() {
            self.halt = Some(Termination::DeadlineExceeded);
            return Descent::Halt;
        }

        let entries = self.entries;
        if depth == entries.len() {
            return self.record_solution(&state.schedule);
        }

        let key = state.memo_key(depth);
        if let Some(&cached) = self.memo.get(&key) {
            self.stats.on_cache_hit();
            return Descent::Score(cached);
        }

        let grid = self.grid;
        let entry = &entries[depth];
        let subject = entry.lesson.subject.as_str();
        let teacher = entry.lesson.teacher.as_deref();
        let mut best: Option<u32> = None;

        for (index, slot) in grid.slots().enumerate() {
            if state.used.contains(index) {
                continue;
            }
            if let Err(rule) = check_placement(
                &state.schedule,
                &*state.occupancy,
                slot,
                subject,
                teacher,
                self.config,
            ) {
                self.stats.on_rejection(rule);
                continue;
            }

            self.stats.on_placement();
            let mut placed = Placement::new(state, slot, index, entry.lesson.clone(), entry.code);
            let below = self.descend(&mut placed, depth + 1);
            drop(placed);
            self.stats.on_backtrack();

            match below {
                Descent::Halt => return Descent::Halt,
                Descent::Score(Some(score)) => {
                    best = Some(best.map_or(score, |b| b.min(score)));
                }
                Descent::Score(None) => {}
            }
        }

        self.memo.insert(key, best);
        Descent::Score(best)
    }

    fn record_solution(&mut self, schedule: &ClassSchedule) -> Descent {
        self.stats.on_solution_found();
        let score = gap_score(schedule);
        if self.best.as_ref().is_none_or(|(best, _)| score < *best) {
            self.stats.on_improvement();
            self.best = Some((score, schedule.clone()));
        }
        if score == 0 {
            self.halt = Some(Termination::ZeroGapReached);
            return Descent::Halt;
        }
        Descent::Score(Some(score))
    }
}
