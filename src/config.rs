//! Solver configuration.
//!
//! All limits have defaults matching common school practice: at most
//! 7 lessons per class per day, at most 2 lessons of one subject per day,
//! at most 6 lessons per teacher per day within one class, and a 60 second
//! search budget per class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default per-class per-day teacher load.
pub const DEFAULT_TEACHER_DAILY_LIMIT: usize = 6;
/// Default number of lessons a class may have per day.
pub const DEFAULT_CLASS_DAILY_LIMIT: usize = 7;
/// Default number of lessons of one subject per class per day.
pub const DEFAULT_MAX_SAME_SUBJECT_PER_DAY: usize = 2;
/// Default search budget per class (seconds).
pub const DEFAULT_SEARCH_DEADLINE_SECONDS: f64 = 60.0;

/// Tunable limits of the timetabling search.
///
/// # Example
/// ```
/// use u_timetable::config::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_class_daily_limit(6)
///     .with_search_deadline_seconds(5.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.teacher_daily_limit, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum lessons one teacher gives one class per day.
    pub teacher_daily_limit: usize,
    /// Maximum lessons of a class per day.
    pub class_daily_limit: usize,
    /// Maximum lessons of the same subject per class per day.
    pub max_same_subject_per_day: usize,
    /// Wall-clock budget of one class search (seconds).
    pub search_deadline_seconds: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            teacher_daily_limit: DEFAULT_TEACHER_DAILY_LIMIT,
            class_daily_limit: DEFAULT_CLASS_DAILY_LIMIT,
            max_same_subject_per_day: DEFAULT_MAX_SAME_SUBJECT_PER_DAY,
            search_deadline_seconds: DEFAULT_SEARCH_DEADLINE_SECONDS,
        }
    }
}

impl SolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-teacher daily limit.
    pub fn with_teacher_daily_limit(mut self, limit: usize) -> Self {
        self.teacher_daily_limit = limit;
        self
    }

    /// Sets the per-class daily limit.
    pub fn with_class_daily_limit(mut self, limit: usize) -> Self {
        self.class_daily_limit = limit;
        self
    }

    /// Sets the same-subject daily cap.
    pub fn with_max_same_subject_per_day(mut self, limit: usize) -> Self {
        self.max_same_subject_per_day = limit;
        self
    }

    /// Sets the search budget in seconds.
    pub fn with_search_deadline_seconds(mut self, seconds: f64) -> Self {
        self.search_deadline_seconds = seconds;
        self
    }

    /// Sets the search budget.
    pub fn with_search_deadline(mut self, deadline: Duration) -> Self {
        self.search_deadline_seconds = deadline.as_secs_f64();
        self
    }

    /// Search budget as a `Duration`.
    ///
    /// Call [`validate`](Self::validate) first; an invalid budget maps to zero.
    pub fn search_deadline(&self) -> Duration {
        Duration::try_from_secs_f64(self.search_deadline_seconds).unwrap_or(Duration::ZERO)
    }

    /// Checks that all limits are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teacher_daily_limit == 0 {
            return Err(ConfigError::ZeroLimit("teacher_daily_limit"));
        }
        if self.class_daily_limit == 0 {
            return Err(ConfigError::ZeroLimit("class_daily_limit"));
        }
        if self.max_same_subject_per_day == 0 {
            return Err(ConfigError::ZeroLimit("max_same_subject_per_day"));
        }
        if !self.search_deadline_seconds.is_finite() || self.search_deadline_seconds < 0.0 {
            return Err(ConfigError::InvalidDeadline(self.search_deadline_seconds));
        }
        Ok(())
    }
}

/// Error returned by [`SolverConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The named limit is zero, which would make every placement infeasible.
    ZeroLimit(&'static str),
    /// The deadline is negative, NaN or infinite.
    InvalidDeadline(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLimit(name) => write!(f, "{name} must be at least 1"),
            ConfigError::InvalidDeadline(secs) => {
                write!(f, "search deadline must be a finite, non-negative number of seconds, got {secs}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SolverConfig::default();
        assert_eq!(c.teacher_daily_limit, 6);
        assert_eq!(c.class_daily_limit, 7);
        assert_eq!(c.max_same_subject_per_day, 2);
        assert_eq!(c.search_deadline(), Duration::from_secs(60));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = SolverConfig::new()
            .with_teacher_daily_limit(1)
            .with_class_daily_limit(5)
            .with_max_same_subject_per_day(3)
            .with_search_deadline(Duration::from_millis(250));
        assert_eq!(c.teacher_daily_limit, 1);
        assert_eq!(c.class_daily_limit, 5);
        assert_eq!(c.max_same_subject_per_day, 3);
        assert_eq!(c.search_deadline(), Duration::from_millis(250));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            SolverConfig::new().with_class_daily_limit(0).validate(),
            Err(ConfigError::ZeroLimit("class_daily_limit"))
        );
        assert!(SolverConfig::new()
            .with_search_deadline_seconds(-1.0)
            .validate()
            .is_err());
        assert!(SolverConfig::new()
            .with_search_deadline_seconds(f64::NAN)
            .validate()
            .is_err());
        assert!(SolverConfig::new()
            .with_search_deadline_seconds(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SolverConfig = serde_json::from_str(r#"{"teacher_daily_limit": 3}"#).unwrap();
        assert_eq!(c.teacher_daily_limit, 3);
        assert_eq!(c.class_daily_limit, DEFAULT_CLASS_DAILY_LIMIT);
        assert_eq!(c.search_deadline_seconds, DEFAULT_SEARCH_DEADLINE_SECONDS);
    }
}
