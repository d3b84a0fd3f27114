//! High score leaderboard
//!
//! Arcade-style three-letter initials, top 10 by score. The game only talks
//! to a `HighScoreStore`; the bundled stores keep the list in memory or in a
//! JSON file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Length of the initials shown on the board
pub const INITIALS_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

impl HighScoreEntry {
    pub fn new(player_name: &str, score: u64, level: u32) -> Result<Self, Error> {
        let player_name = format_initials(player_name).ok_or(Error::EmptyName)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Ok(Self {
            player_name,
            score,
            level,
            timestamp,
        })
    }
}

/// Upper-case, trim and pad/truncate a name to three characters.
/// `None` for a blank name.
pub fn format_initials(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut initials: String = trimmed.to_uppercase().chars().take(INITIALS_LEN).collect();
    while initials.chars().count() < INITIALS_LEN {
        initials.push(' ');
    }
    Some(initials)
}

/// Persistence boundary for the leaderboard
pub trait HighScoreStore {
    /// Record an entry and return the updated ranking
    fn submit(&mut self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, Error>;

    /// Current ranking, best first
    fn top(&self) -> Result<Vec<HighScoreEntry>, Error>;
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Sorted descending by score; ties keep the earlier entry ahead
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HighScoreStore for HighScores {
    fn submit(&mut self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, Error> {
        self.add(entry);
        Ok(self.entries.clone())
    }

    fn top(&self) -> Result<Vec<HighScoreEntry>, Error> {
        Ok(self.entries.clone())
    }
}

/// Leaderboard persisted as a JSON file, rewritten after every submission
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: HighScores,
}

impl JsonFileStore {
    /// Open the store; a missing file is an empty leaderboard
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let scores = match std::fs::read_to_string(&path) {
            Ok(json) => {
                let mut scores: HighScores = serde_json::from_str(&json)?;
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, scores })
    }

    fn save(&self) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", self.scores.entries.len());
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn submit(&mut self, entry: HighScoreEntry) -> Result<Vec<HighScoreEntry>, Error> {
        if self.scores.add(entry).is_some() {
            self.save()?;
        }
        Ok(self.scores.entries.clone())
    }

    fn top(&self) -> Result<Vec<HighScoreEntry>, Error> {
        Ok(self.scores.entries.clone())
    }
}
