//! Simulation statistics collection trait

use serde::{Deserialize, Serialize};

/// Trait for collecting simulation statistics
///
/// Rules report what they did without depending on how (or whether) the
/// driver aggregates it.
pub trait SimStats {
    /// Record that a cell was split into smaller cells
    fn record_split(&mut self);

    /// Record that a sleep merge was applied
    fn record_merge(&mut self);

    /// Record that a snip-and-swap move was applied
    fn record_move(&mut self);

    /// Record that a cell changed material in place
    fn record_recolour(&mut self);
}

/// Plain counters over whatever window the driver chooses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub splits: u64,
    pub merges: u64,
    pub moves: u64,
    pub recolours: u64,
}

impl TickStats {
    /// Total edits of any kind
    pub fn total(&self) -> u64 {
        self.splits + self.merges + self.moves + self.recolours
    }
}

impl SimStats for TickStats {
    fn record_split(&mut self) {
        self.splits += 1;
    }

    fn record_merge(&mut self) {
        self.merges += 1;
    }

    fn record_move(&mut self) {
        self.moves += 1;
    }

    fn record_recolour(&mut self) {
        self.recolours += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_stats_counts() {
        let mut stats = TickStats::default();

        stats.record_split();
        stats.record_split();
        stats.record_merge();
        stats.record_move();
        stats.record_move();
        stats.record_move();

        assert_eq!(stats.splits, 2);
        assert_eq!(stats.merges, 1);
        assert_eq!(stats.moves, 3);
        assert_eq!(stats.recolours, 0);
        assert_eq!(stats.total(), 6);
    }
}
