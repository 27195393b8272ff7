//! Timetabling domain models.
//!
//! Provides the core data types for describing a school week and the
//! lessons placed into it.
//!
//! # Domain Mappings
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | SlotGrid | Days × periods of the school week |
//! | Slot | One (day, period) cell |
//! | ClassRecord | A class with weekly subject requirements |
//! | Teacher | Shared resource qualified by specialization |
//! | Lesson | Subject + optional teacher in one slot |
//! | ClassSchedule | One class's week |
//! | OccupancyIndex | Teachers committed per slot across classes |

mod class;
mod grid;
mod occupancy;
mod schedule;
mod teacher;

pub use class::{ClassRecord, FixedSlot};
pub use grid::{GridError, Slot, SlotGrid, DEFAULT_DAYS, DEFAULT_PERIODS_PER_DAY};
pub use occupancy::OccupancyIndex;
pub use schedule::{ClassSchedule, Lesson, Violation, ViolationType};
pub use teacher::{first_qualified, qualified_count, Teacher};
