//! Weekly slot grid.
//!
//! The grid is the closed Cartesian product of an ordered list of day labels
//! and an ordered list of period labels. A [`Slot`] is a pair of positions
//! into those lists, so it is `Copy` and cheap to hash.
//!
//! Canonical slot order is days outer, periods inner. The search engine
//! relies on this order being stable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::normalize_text;

/// Default day labels (Monday to Friday).
pub const DEFAULT_DAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];

/// Default number of periods per day.
pub const DEFAULT_PERIODS_PER_DAY: usize = 7;

/// A (day, period) position in the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Day position (0-based, grid order).
    pub day: u8,
    /// Period position within the day (0-based, grid order).
    pub period: u8,
}

impl Slot {
    /// Creates a slot from grid positions.
    #[inline]
    pub const fn new(day: u8, period: u8) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(day {}, period {})", self.day, self.period)
    }
}

/// Error raised when building a [`SlotGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// No day labels were given.
    NoDays,
    /// No period labels were given.
    NoPeriods,
    /// A label occurs twice after normalization.
    DuplicateLabel(String),
    /// More than 255 days or periods.
    TooLarge,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::NoDays => write!(f, "slot grid has no days"),
            GridError::NoPeriods => write!(f, "slot grid has no periods"),
            GridError::DuplicateLabel(label) => write!(f, "duplicate grid label '{label}'"),
            GridError::TooLarge => write!(f, "slot grid exceeds 255 days or periods"),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Deserialize)]
struct SlotGridLabels {
    days: Vec<String>,
    periods: Vec<String>,
}

impl TryFrom<SlotGridLabels> for SlotGrid {
    type Error = GridError;

    fn try_from(labels: SlotGridLabels) -> Result<Self, Self::Error> {
        SlotGrid::new(labels.days, labels.periods)
    }
}

/// The fixed enumeration of weekly lesson slots.
///
/// # Example
/// ```
/// use u_timetable::models::{Slot, SlotGrid};
///
/// let grid = SlotGrid::default();
/// assert_eq!(grid.len(), 35);
/// assert_eq!(grid.slot("Monday", "1"), Some(Slot::new(0, 0)));
/// assert_eq!(grid.slots().nth(7), Some(Slot::new(1, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlotGridLabels")]
pub struct SlotGrid {
    days: Vec<String>,
    periods: Vec<String>,
}

impl SlotGrid {
    /// Creates a grid from day and period labels (normalized).
    pub fn new<D, P>(days: D, periods: P) -> Result<Self, GridError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let days: Vec<String> = days.into_iter().map(|d| normalize_text(d.as_ref())).collect();
        let periods: Vec<String> = periods
            .into_iter()
            .map(|p| normalize_text(p.as_ref()))
            .collect();

        if days.is_empty() {
            return Err(GridError::NoDays);
        }
        if periods.is_empty() {
            return Err(GridError::NoPeriods);
        }
        if days.len() > u8::MAX as usize || periods.len() > u8::MAX as usize {
            return Err(GridError::TooLarge);
        }
        for labels in [&days, &periods] {
            for (i, label) in labels.iter().enumerate() {
                if labels[..i].contains(label) {
                    return Err(GridError::DuplicateLabel(label.clone()));
                }
            }
        }

        Ok(Self { days, periods })
    }

    /// Creates a grid with numbered periods `"1"..="n"`.
    pub fn with_numbered_periods<D>(days: D, periods_per_day: usize) -> Result<Self, GridError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self::new(days, (1..=periods_per_day).map(|p| p.to_string()))
    }

    /// Day labels in grid order.
    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Period labels in grid order.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Number of days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of periods per day.
    #[inline]
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Total number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.days.len() * self.periods.len()
    }

    /// Always `false`; a grid has at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of a day label.
    pub fn day_position(&self, label: &str) -> Option<u8> {
        let label = normalize_text(label);
        self.days.iter().position(|d| *d == label).map(|p| p as u8)
    }

    /// Position of a period label.
    pub fn period_position(&self, label: &str) -> Option<u8> {
        let label = normalize_text(label);
        self.periods.iter().position(|p| *p == label).map(|p| p as u8)
    }

    /// Resolves a (day label, period label) pair.
    pub fn slot(&self, day: &str, period: &str) -> Option<Slot> {
        Some(Slot::new(self.day_position(day)?, self.period_position(period)?))
    }

    /// Label of a day position.
    pub fn day_label(&self, day: u8) -> Option<&str> {
        self.days.get(day as usize).map(String::as_str)
    }

    /// Label of a period position.
    pub fn period_label(&self, period: u8) -> Option<&str> {
        self.periods.get(period as usize).map(String::as_str)
    }

    /// Whether the slot lies inside the grid.
    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        (slot.day as usize) < self.days.len() && (slot.period as usize) < self.periods.len()
    }

    /// Dense index of a slot in canonical order.
    #[inline]
    pub fn index(&self, slot: Slot) -> usize {
        slot.day as usize * self.periods.len() + slot.period as usize
    }

    /// Slot at a dense index.
    #[inline]
    pub fn slot_at(&self, index: usize) -> Slot {
        let periods = self.periods.len();
        Slot::new((index / periods) as u8, (index % periods) as u8)
    }

    /// All slots in canonical order (days outer, periods inner).
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.len()).map(move |i| self.slot_at(i))
    }

    /// Slots of one day in period order.
    pub fn slots_of_day(&self, day: u8) -> impl Iterator<Item = Slot> {
        (0..self.periods.len() as u8).map(move |p| Slot::new(day, p))
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS.iter().map(|d| d.to_string()).collect(),
            periods: (1..=DEFAULT_PERIODS_PER_DAY).map(|p| p.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = SlotGrid::default();
        assert_eq!(grid.day_count(), 5);
        assert_eq!(grid.period_count(), 7);
        assert_eq!(grid.len(), 35);
        assert_eq!(grid.day_label(4), Some("friday"));
        assert_eq!(grid.period_label(6), Some("7"));
        assert_eq!(grid.period_label(7), None);
    }

    #[test]
    fn test_canonical_order() {
        let grid = SlotGrid::with_numbered_periods(["mon", "tue"], 3).unwrap();
        let slots: Vec<Slot> = grid.slots().collect();
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[0], Slot::new(0, 0));
        assert_eq!(slots[2], Slot::new(0, 2));
        assert_eq!(slots[3], Slot::new(1, 0));
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(grid.index(*slot), i);
            assert_eq!(grid.slot_at(i), *slot);
        }
    }

    #[test]
    fn test_label_resolution_is_normalized() {
        let grid = SlotGrid::new(["Monday", "Tuesday"], ["Period1", "Period2"]).unwrap();
        assert_eq!(grid.slot(" MONDAY", "period2"), Some(Slot::new(0, 1)));
        assert_eq!(grid.slot("sunday", "period1"), None);
        assert_eq!(grid.slot("monday", "period9"), None);
    }

    #[test]
    fn test_invalid_grids() {
        let no_periods: [&str; 0] = [];
        assert_eq!(SlotGrid::new(["mon"], no_periods), Err(GridError::NoPeriods));
        assert_eq!(SlotGrid::new(no_periods, ["1"]), Err(GridError::NoDays));
        assert_eq!(
            SlotGrid::new(["mon", "Mon"], ["1"]),
            Err(GridError::DuplicateLabel("mon".into()))
        );
    }

    #[test]
    fn test_contains_and_day_slots() {
        let grid = SlotGrid::with_numbered_periods(["mon", "tue"], 2).unwrap();
        assert!(grid.contains(Slot::new(1, 1)));
        assert!(!grid.contains(Slot::new(2, 0)));
        let day: Vec<Slot> = grid.slots_of_day(1).collect();
        assert_eq!(day, vec![Slot::new(1, 0), Slot::new(1, 1)]);
    }

    #[test]
    fn test_grid_deserialize_validates() {
        let grid: SlotGrid =
            serde_json::from_str(r#"{"days":["Mon","Tue"],"periods":["1","2","3"]}"#).unwrap();
        assert_eq!(grid.len(), 6);
        let bad: Result<SlotGrid, _> = serde_json::from_str(r#"{"days":[],"periods":["1"]}"#);
        assert!(bad.is_err());
    }
}
