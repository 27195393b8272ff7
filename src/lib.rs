//! School timetabling for the U-Engine ecosystem.
//!
//! Places each class's weekly lessons into a day × period grid so that no
//! teacher is in two classes at once, daily limits hold, and teachers have
//! as few idle periods between lessons as possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `SlotGrid`, `Slot`, `ClassRecord`,
//!   `Teacher`, `Lesson`, `ClassSchedule`, `OccupancyIndex`
//! - **`text`**: Normalization and `"subject:count"` requirement parsing
//! - **`config`**: `SolverConfig` limits and search deadline
//! - **`constraints`**: The five hard placement rules
//! - **`gaps`**: Teacher idle-gap scoring
//! - **`search`**: Memoized backtracking search for one class
//! - **`scheduler`**: Class solver, school-wide orchestrator, KPIs
//! - **`validation`**: Input integrity checks and timetable audit
//! - **`error`**: `TimetableError`
//!
//! # Architecture
//!
//! Classes are solved one at a time. The only state shared between them is
//! the `OccupancyIndex`, passed down by `&mut`; there is no global state.
//! Logging goes through `tracing`; the crate never installs a subscriber.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod config;
pub mod constraints;
pub mod error;
pub mod gaps;
pub mod models;
pub mod scheduler;
pub mod search;
pub mod text;
pub mod validation;

pub use config::SolverConfig;
pub use error::TimetableError;
pub use scheduler::{Timetable, TimetableScheduler};
