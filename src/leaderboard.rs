//! Final-score records and the in-session leaderboard
//!
//! Kept in memory for the current session only; remote submission is the
//! job of a `LeaderboardClient`.

use serde::{Deserialize, Serialize};

/// Maximum number of records to keep
pub const MAX_RECORDS: usize = 10;

/// Emitted once per finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub score: u64,
    pub distance: f32,
}

/// Top scores of this session, best first
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score makes the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_RECORDS {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a record if it qualifies.
    /// Returns the rank achieved (1-indexed) or None.
    pub fn record(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        // Ties keep the earlier run ahead
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
