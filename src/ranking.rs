//! Ranking leaderboard
//!
//! Persisted as JSON, keeps the best 7 finished runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::QuantumError;

/// Maximum number of ranking entries to keep
pub const MAX_RANKING_ENTRIES: usize = 7;

/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 12;

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// Final run score (may be negative after restart penalties)
    pub score: i64,
}

/// Ranking leaderboard, sorted best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Index a new score would take. Equal scores go below existing ones.
    fn slot_for(&self, score: i64) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// True while the board has room or `score` beats the lowest entry
    pub fn qualifies(&self, score: i64) -> bool {
        self.slot_for(score) < MAX_RANKING_ENTRIES
    }

    /// 1-based place `score` would take, if it makes the board at all
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        let slot = self.slot_for(score);
        (slot < MAX_RANKING_ENTRIES).then_some(slot + 1)
    }

    /// Add a finished run. Names are trimmed to `MAX_NAME_LEN` characters and
    /// empty names are refused. Returns the 1-based rank achieved.
    pub fn add(&mut self, name: &str, score: i64) -> Option<usize> {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() {
            return None;
        }
        let rank = self.potential_rank(score)?;

        self.entries.insert(rank - 1, RankingEntry { name, score });
        self.entries.truncate(MAX_RANKING_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse a ranking file's contents, re-sorting and trimming it
    pub fn from_json(json: &str) -> Result<Self, QuantumError> {
        let mut ranking: Ranking = serde_json::from_str(json)?;
        ranking.entries.sort_by(|a, b| b.score.cmp(&a.score));
        ranking.entries.truncate(MAX_RANKING_ENTRIES);
        Ok(ranking)
    }

    /// Load the ranking; a missing or unreadable file gives an empty board
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No ranking at {} ({e}), starting fresh", path.display());
                return Self::new();
            }
        };

        match Self::from_json(&json) {
            Ok(ranking) => {
                log::info!("Loaded {} ranking entries", ranking.entries.len());
                ranking
            }
            Err(e) => {
                log::warn!("Ignoring corrupt ranking at {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), QuantumError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Ranking saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_descending_order() {
        let mut ranking = Ranking::new();
        assert_eq!(ranking.add("ada", 500), Some(1));
        assert_eq!(ranking.add("bob", 900), Some(1));
        assert_eq!(ranking.add("cy", 700), Some(2));
        let scores: Vec<i64> = ranking.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 700, 500]);
        assert_eq!(ranking.top_score(), Some(900));
    }

    #[test]
    fn test_board_is_capped() {
        let mut ranking = Ranking::new();
        for i in 0..MAX_RANKING_ENTRIES as i64 {
            ranking.add("p", 100 + i);
        }
        assert!(!ranking.qualifies(100));
        assert_eq!(ranking.potential_rank(50), None);
        assert_eq!(ranking.potential_rank(1000), Some(1));
        assert_eq!(ranking.add("late", 100), None);
        assert_eq!(ranking.add("best", 1000), Some(1));
        assert_eq!(ranking.entries.len(), MAX_RANKING_ENTRIES);
        assert_eq!(ranking.entries.last().map(|e| e.score), Some(101));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut ranking = Ranking::new();
        ranking.add("first", 300);
        assert_eq!(ranking.add("second", 300), Some(2));
        assert_eq!(ranking.entries[0].name, "first");
    }

    #[test]
    fn test_names_trimmed_and_required() {
        let mut ranking = Ranking::new();
        assert_eq!(ranking.add("   ", 10), None);
        ranking.add("a_very_long_player_name", 10);
        assert_eq!(ranking.entries[0].name, "a_very_long_");
    }

    #[test]
    fn test_json_shape_is_plain_list() {
        let mut ranking = Ranking::new();
        ranking.add("ada", 1200);
        let json = serde_json::to_string(&ranking).unwrap();
        assert_eq!(json, r#"[{"name":"ada","score":1200}]"#);

        let parsed = Ranking::from_json(
            r#"[{"name":"x","score":5},{"name":"y","score":50},{"name":"z","score":-20}]"#,
        )
        .unwrap();
        let names: Vec<&str> = parsed.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let ranking = Ranking::load("/definitely/not/here/ranking.json");
        assert!(ranking.is_empty());
    }
}
