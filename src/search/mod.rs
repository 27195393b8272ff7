//! Backtracking search for one class.
//!
//! Places a class's lessons into the slot grid one at a time, checking every
//! placement against the hard constraints and the shared occupancy index,
//! and keeps the complete schedule with the fewest teacher gaps.
//!
//! # Termination
//!
//! | Reason | Schedule |
//! |--------|----------|
//! | `Exhausted` | Optimal, or `None` if infeasible |
//! | `ZeroGapReached` | Optimal (gap 0) |
//! | `DeadlineExceeded` | Best found so far, possibly `None` |
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3: Backtracking Search for CSPs

mod engine;
mod state;
mod stats;

pub use engine::{BacktrackingSearch, SearchInput, SearchOutcome, TeacherMap, Termination};
pub use stats::SearchStatistics;
