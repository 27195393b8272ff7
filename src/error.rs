//! Crate error type.
//!
//! Search infeasibility and deadline expiry are not errors; they are
//! reported through [`Termination`](crate::search::Termination). Errors are
//! reserved for malformed input that prevents a search from starting.

use std::fmt;

use crate::config::ConfigError;
use crate::models::GridError;
use crate::text::ParseError;
use crate::validation::ValidationError;

/// Errors raised before or around a search.
#[derive(Debug, Clone, PartialEq)]
pub enum TimetableError {
    /// Solver configuration is unusable.
    Config(ConfigError),
    /// Slot grid labels are invalid.
    Grid(GridError),
    /// Requirement text could not be parsed.
    Parse(ParseError),
    /// A fixed slot names a day missing from the grid.
    UnknownDay {
        /// Class the fixed slot belongs to.
        class_id: String,
        /// Offending label.
        label: String,
    },
    /// A fixed slot names a period missing from the grid.
    UnknownPeriod {
        /// Class the fixed slot belongs to.
        class_id: String,
        /// Offending label.
        label: String,
    },
    /// Input validation failed.
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::Config(e) => write!(f, "invalid configuration: {e}"),
            TimetableError::Grid(e) => write!(f, "invalid slot grid: {e}"),
            TimetableError::Parse(e) => write!(f, "invalid subject list: {e}"),
            TimetableError::UnknownDay { class_id, label } => {
                write!(f, "class '{class_id}': unknown day '{label}' in fixed slot")
            }
            TimetableError::UnknownPeriod { class_id, label } => {
                write!(f, "class '{class_id}': unknown period '{label}' in fixed slot")
            }
            TimetableError::Invalid(errors) => {
                write!(f, "{} validation error(s)", errors.len())?;
                if let Some(first) = errors.first() {
                    write!(f, ", first: {}", first.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for TimetableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TimetableError::Config(e) => Some(e),
            TimetableError::Grid(e) => Some(e),
            TimetableError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for TimetableError {
    fn from(e: ConfigError) -> Self {
        TimetableError::Config(e)
    }
}

impl From<GridError> for TimetableError {
    fn from(e: GridError) -> Self {
        TimetableError::Grid(e)
    }
}

impl From<ParseError> for TimetableError {
    fn from(e: ParseError) -> Self {
        TimetableError::Parse(e)
    }
}

impl From<Vec<ValidationError>> for TimetableError {
    fn from(errors: Vec<ValidationError>) -> Self {
        TimetableError::Invalid(errors)
    }
}
