use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::constraints::Rejection;

/// Counters collected during one class search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Recursive calls, including terminal and cached ones.
    pub nodes_explored: u64,
    /// Lessons placed (and later undone).
    pub placements: u64,
    /// Refused placements, indexed by [`Rejection::index`].
    pub rejections: [u64; 5],
    /// Placements undone after their subtree finished.
    pub backtracks: u64,
    /// Subtrees answered from the memo cache.
    pub cache_hits: u64,
    /// Complete schedules reached.
    pub solutions_found: u64,
    /// Improvements of the best schedule.
    pub improvements: u64,
    /// Wall-clock time of the search.
    pub elapsed: Duration,
}

impl SearchStatistics {
    /// Counts one recursive call.
    #[inline]
    pub(super) fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    /// Counts a lesson placed on the schedule.
    #[inline]
    pub(super) fn on_placement(&mut self) {
        self.placements = self.placements.saturating_add(1);
    }

    /// Counts a placement refused by `rule`.
    #[inline]
    pub(super) fn on_rejection(&mut self, rule: Rejection) {
        let slot = &mut self.rejections[rule.index()];
        *slot = slot.saturating_add(1);
    }

    /// Counts a placement undone.
    #[inline]
    pub(super) fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    /// Counts a subtree answered from the memo.
    #[inline]
    pub(super) fn on_cache_hit(&mut self) {
        self.cache_hits = self.cache_hits.saturating_add(1);
    }

    /// Counts a complete schedule.
    #[inline]
    pub(super) fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    /// Counts a new best schedule.
    #[inline]
    pub(super) fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
    }

    /// Records the search wall-clock time.
    #[inline]
    pub(super) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Refusals attributed to `rule`.
    pub fn rejections_for(&self, rule: Rejection) -> u64 {
        self.rejections[rule.index()]
    }

    /// Refusals over all rules.
    pub fn total_rejections(&self) -> u64 {
        self.rejections.iter().fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes explored:   {}", self.nodes_explored)?;
        writeln!(f, "  Placements:       {}", self.placements)?;
        writeln!(f, "  Backtracks:       {}", self.backtracks)?;
        writeln!(f, "  Cache hits:       {}", self.cache_hits)?;
        writeln!(f, "  Solutions found:  {}", self.solutions_found)?;
        writeln!(f, "  Improvements:     {}", self.improvements)?;
        for rule in Rejection::ALL {
            writeln!(f, "  Rejected ({rule}): {}", self.rejections_for(rule))?;
        }
        writeln!(f, "  Total time:       {:.2?}", self.elapsed)?;
        Ok(())
    }
}
