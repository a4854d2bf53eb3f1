//! Best level clear times
//!
//! In-memory leaderboard of the fastest clears, lowest time first.

use serde::{Deserialize, Serialize};

/// Maximum number of clear times to keep
pub const MAX_CLEAR_TIMES: usize = 10;

/// One level clear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearTime {
    /// Timer reading when the level was won, bonuses included
    pub elapsed_ms: f64,
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearTimes {
    pub entries: Vec<ClearTime>,
}

impl ClearTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a clear in `elapsed_ms` would make the board
    pub fn qualifies(&self, elapsed_ms: f64) -> bool {
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return false;
        }
        if self.entries.len() < MAX_CLEAR_TIMES {
            return true;
        }
        self.entries
            .last()
            .is_none_or(|slowest| elapsed_ms < slowest.elapsed_ms)
    }

    /// Rank (1-indexed) a clear would take, `None` if it doesn't qualify
    pub fn potential_rank(&self, elapsed_ms: f64) -> Option<usize> {
        if !self.qualifies(elapsed_ms) {
            return None;
        }
        let pos = self.entries.iter().position(|e| elapsed_ms < e.elapsed_ms);
        Some(pos.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a clear. Returns the rank achieved, or `None` if it didn't qualify.
    pub fn record(&mut self, elapsed_ms: f64, level: u32) -> Option<usize> {
        let rank = self.potential_rank(elapsed_ms)?;
        self.entries.insert(rank - 1, ClearTime { elapsed_ms, level });
        self.entries.truncate(MAX_CLEAR_TIMES);
        log::info!("Level {level} cleared in {elapsed_ms:.0} ms (rank {rank})");
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fastest clear so far
    pub fn best(&self) -> Option<&ClearTime> {
        self.entries.first()
    }
}
