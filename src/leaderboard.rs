use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Username -> recorded profit/loss score, persisted as a flat JSON object.
///
/// The file is the game's only durable artifact. It is loaded at startup,
/// rewritten after every settlement, and cleared on explicit reset. Scores
/// are written at settlement only; starting a session leaves the board alone.
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
    scores: HashMap<String, f64>,
}

fn default_leaderboard_path() -> PathBuf {
    std::env::var("CRISIS_LEADERBOARD_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/leaderboard.json"))
}

impl LeaderboardStore {
    /// Open the default store, creating an empty board when no file exists.
    pub fn open_default() -> Result<Self> {
        Self::open(default_leaderboard_path())
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let scores = if path.exists() {
            let payload = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&payload)
                .with_context(|| format!("failed to parse leaderboard json {}", path.display()))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, scores })
    }

    /// Record (or overwrite) a username's score and persist immediately.
    pub fn record(&mut self, username: &str, score: f64) -> Result<()> {
        self.scores.insert(username.to_string(), score);
        self.persist()
    }

    /// Clear every entry and persist the empty board.
    pub fn reset(&mut self) -> Result<()> {
        self.scores.clear();
        self.persist()
    }

    pub fn score_for(&self, username: &str) -> Option<f64> {
        self.scores.get(username).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Snapshot sorted by score descending, ties broken by username so the
    /// ordering is stable for display.
    pub fn sorted_entries(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .scores
            .iter()
            .map(|(name, score)| (name.clone(), *score))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.scores)
            .context("failed to serialize leaderboard json")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}
