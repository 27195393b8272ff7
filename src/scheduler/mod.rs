//! Class and school timetabling, and KPI evaluation.
//!
//! # Algorithm
//!
//! `ClassSolver` prepares one class (lesson expansion, scarcity ordering,
//! teacher choice, fixed slots) and runs the backtracking search.
//! `TimetableScheduler` runs it for every class in order, committing each
//! result to the shared occupancy index before the next class.
//!
//! # KPI
//!
//! `TimetableKpi` computes placement rate, gap scores and teacher loads.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Pillay (2014), "A survey of school timetabling research"

mod class;
mod kpi;
mod timetable;

pub use class::{build_teacher_map, expand_subjects, seed_fixed_slots, ClassSolver};
pub use kpi::TimetableKpi;
pub use timetable::{ClassOutcome, NamedSchedules, Timetable, TimetableRequest, TimetableScheduler};
